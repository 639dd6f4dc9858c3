//! Core application

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

use crate::core::cli::{self, CliConfig, Commands, ViewCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::data::views::{
    FileViewStore, ViewStore, ViewStoreError, load_filter, validate_view_id, view_with_filter,
};
use crate::domain::filters::{self, FieldRegistry, FilterGroup};

pub struct CoreApp {
    pub config: AppConfig,
    pub registry: Arc<FieldRegistry>,
    pub views: Arc<dyn ViewStore>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        app.execute(command, &mut out)
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let views = FileViewStore::open(&config.views.dir).with_context(|| {
            format!(
                "Failed to open saved views directory: {}",
                config.views.dir.display()
            )
        })?;
        tracing::debug!(backend = views.backend_name(), "View store initialized");
        Ok(Self::with_store(config, Arc::new(views)))
    }

    /// Assemble the app around an already opened view store
    pub fn with_store(config: AppConfig, views: Arc<dyn ViewStore>) -> Self {
        let registry = config
            .reference_lists
            .iter()
            .fold(FieldRegistry::leads(), |registry, (name, options)| {
                registry.with_reference_list(name.clone(), options.clone())
            });
        Self {
            config,
            registry: Arc::new(registry),
            views,
        }
    }

    /// Run one command, writing its output to `out`
    pub fn execute(&self, command: Commands, out: &mut dyn Write) -> Result<()> {
        match command {
            Commands::Fields => self.print_fields(out),
            Commands::Eval {
                records,
                filter,
                view,
                count,
            } => {
                let root = match (filter, view) {
                    (Some(path), _) => self.read_filter_lenient(&path)?,
                    (None, Some(view_id)) => {
                        load_filter(self.views.as_ref(), &view_id, self.config.codec_limits())
                    }
                    (None, None) => FilterGroup::root(),
                };
                self.eval(&records, &root, count, out)
            }
            Commands::Views { command } => self.handle_view_command(command, out),
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_writer(io::stderr)
            .with_env_filter(filter)
            .init();
    }

    // =========================================================================
    // fields
    // =========================================================================

    fn print_fields(&self, out: &mut dyn Write) -> Result<()> {
        for field in self.registry.fields() {
            let operators: Vec<&str> = field
                .field_type
                .operators()
                .iter()
                .map(|op| op.as_str())
                .collect();
            writeln!(
                out,
                "{:<24} {:<12} {}",
                field.key,
                field.field_type.as_str(),
                operators.join(", ")
            )?;
            let options = self.registry.select_options(&field.key);
            if !options.is_empty() {
                let values: Vec<String> = options
                    .iter()
                    .map(|o| format!("{} ({})", o.value, o.label))
                    .collect();
                writeln!(out, "{:<24} options: {}", "", values.join(", "))?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // eval
    // =========================================================================

    fn eval(
        &self,
        records_path: &Path,
        root: &FilterGroup,
        count_only: bool,
        out: &mut dyn Write,
    ) -> Result<()> {
        let content = fs::read_to_string(records_path).with_context(|| {
            format!("Failed to read records file: {}", records_path.display())
        })?;
        let records: Vec<JsonValue> = serde_json::from_str(&content).with_context(|| {
            format!(
                "Records file must contain a JSON array: {}",
                records_path.display()
            )
        })?;

        let matches = filters::filter_records(&records, root, &self.registry);
        tracing::info!(
            total = records.len(),
            matched = matches.len(),
            conditions = root.count_conditions(),
            "Filter evaluated"
        );

        if count_only {
            writeln!(out, "{}", matches.len())?;
        } else {
            writeln!(out, "{}", serde_json::to_string_pretty(&matches)?)?;
        }
        Ok(())
    }

    /// Read a filter file, falling back to an empty filter when it is unreadable JSON
    fn read_filter_lenient(&self, path: &Path) -> Result<FilterGroup> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter file: {}", path.display()))?;
        Ok(filters::deserialize_with(&raw, self.config.codec_limits()))
    }

    /// Read a filter file, rejecting anything that does not decode cleanly
    fn read_filter_strict(&self, path: &Path) -> Result<FilterGroup> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter file: {}", path.display()))?;
        filters::try_deserialize(&raw, self.config.codec_limits())
            .with_context(|| format!("Invalid filter file: {}", path.display()))
    }

    // =========================================================================
    // views
    // =========================================================================

    fn handle_view_command(&self, command: ViewCommands, out: &mut dyn Write) -> Result<()> {
        match command {
            ViewCommands::List => self.list_views(out),
            ViewCommands::Show { id } => {
                let view = self
                    .views
                    .get(&id)?
                    .ok_or_else(|| ViewStoreError::NotFound(id.clone()))?;
                writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
                Ok(())
            }
            ViewCommands::Delete { id } => {
                if !self.views.delete(&id)? {
                    return Err(ViewStoreError::NotFound(id).into());
                }
                tracing::info!(view_id = %id, "Deleted view");
                writeln!(out, "Deleted: {}", id)?;
                Ok(())
            }
            ViewCommands::Save {
                id,
                name,
                filter,
                columns,
                mode,
                shared,
            } => {
                validate_view_id(&id)?;
                let root = self.read_filter_strict(&filter)?;
                let mut view = view_with_filter(self.views.as_ref(), &id, &root)?;
                if let Some(name) = name {
                    view.name = name;
                }
                let columns: Vec<String> = columns
                    .into_iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect();
                if !columns.is_empty() {
                    for column in &columns {
                        if self.registry.descriptor(column).is_none() {
                            tracing::warn!(column = %column, "Column is not a known field");
                        }
                    }
                    view.columns = columns;
                }
                if let Some(mode) = mode {
                    view.view_mode = mode;
                }
                if shared {
                    view.shared = true;
                }
                self.views.put(&view)?;
                tracing::info!(
                    view_id = %view.id,
                    conditions = root.count_conditions(),
                    "Saved view"
                );
                writeln!(out, "Saved: {}", view.id)?;
                Ok(())
            }
        }
    }

    fn list_views(&self, out: &mut dyn Write) -> Result<()> {
        let views = self.views.list()?;
        if views.is_empty() {
            writeln!(out, "No saved views.")?;
            return Ok(());
        }
        for view in views {
            let conditions = view
                .filter_group(self.config.codec_limits())
                .count_conditions();
            writeln!(
                out,
                "{:<24} {:<32} {:<7} {:>3} filters{}",
                view.id,
                view.name,
                view.view_mode,
                conditions,
                if view.shared { "  shared" } else { "" }
            )?;
        }
        Ok(())
    }
}
