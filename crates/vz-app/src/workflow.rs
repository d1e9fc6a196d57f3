//! Interactive visualization session over one or more loaded files

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use vz_core::{RequestState, Table};
use vz_data::FileDescriptor;
use vz_views::tables::DEFAULT_TABLE_ROWS;
use vz_views::{
    available_columns, available_shared_columns, validate, ChartKind, ChartRenderer, ChartRequest,
    ColumnRole, RenderOutput,
};

use crate::preview::{file_info, render_preview};
use crate::prompt::Prompter;
use crate::settings::Settings;

/// How several files are visualized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiFileMode {
    SameForAll,
    DifferentPerFile,
    Compare,
}

impl MultiFileMode {
    pub const ALL: [MultiFileMode; 3] = [
        MultiFileMode::SameForAll,
        MultiFileMode::DifferentPerFile,
        MultiFileMode::Compare,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MultiFileMode::SameForAll => "Same visualization for all files (recommended)",
            MultiFileMode::DifferentPerFile => "Different visualization for each file",
            MultiFileMode::Compare => "Compare files side-by-side",
        }
    }
}

/// Outcome of asking the user to configure one chart
enum Configured {
    Request(ChartRequest),
    /// The table has no column usable for a required role
    Unavailable(String),
    Quit,
}

/// Drives chart requests from chart-kind selection to rendering
pub struct VisualizationWorkflow<'a, P, R> {
    settings: &'a Settings,
    prompter: &'a mut P,
    renderer: &'a mut R,
    state: RequestState,
}

impl<'a, P: Prompter, R: ChartRenderer> VisualizationWorkflow<'a, P, R> {
    pub fn new(settings: &'a Settings, prompter: &'a mut P, renderer: &'a mut R) -> Self {
        Self {
            settings,
            prompter,
            renderer,
            state: RequestState::default(),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    fn transition(&mut self, next: RequestState) -> Result<()> {
        self.state = self.state.advance(next)?;
        Ok(())
    }

    /// Return to chart-kind selection, abandoning any request in progress
    fn begin_request(&mut self) -> Result<()> {
        match self.state {
            RequestState::SelectingChartKind => Ok(()),
            RequestState::Loading | RequestState::Rendered | RequestState::Error => {
                self.transition(RequestState::SelectingChartKind)
            }
            _ => {
                self.transition(RequestState::Error)?;
                self.transition(RequestState::SelectingChartKind)
            }
        }
    }

    /// Load every file, preview it, then visualize according to the file count
    pub fn run(&mut self, files: &[FileDescriptor]) -> Result<()> {
        let separator = "=".repeat(50);
        self.prompter.say(&format!("\n{separator}"))?;
        if files.len() > 1 {
            self.prompter
                .say(&format!("SMART VISUALIZATION WORKFLOW - {} FILES", files.len()))?;
        } else {
            self.prompter.say("VISUALIZATION WORKFLOW")?;
        }
        self.prompter.say(&separator)?;

        let tables = self.load_all(files)?;
        if tables.is_empty() {
            self.prompter.say("No files loaded successfully")?;
            return Ok(());
        }

        match tables.as_slice() {
            [table] => self.interactive(table)?,
            _ => match self.select_mode()? {
                Some(MultiFileMode::SameForAll) => self.run_same_for_all(&tables)?,
                Some(MultiFileMode::DifferentPerFile) => self.run_different_per_file(&tables)?,
                Some(MultiFileMode::Compare) => self.run_comparison(&tables)?,
                None => {}
            },
        }

        self.prompter.say("\nWorkflow completed!")?;
        Ok(())
    }

    fn load_all(&mut self, files: &[FileDescriptor]) -> Result<Vec<Arc<Table>>> {
        self.transition(RequestState::Loading)?;

        let mut tables = Vec::with_capacity(files.len());
        for descriptor in files {
            self.prompter.say(&format!("\n{}", file_info(descriptor)))?;
            match vz_data::load(descriptor, &self.settings.load) {
                Ok(table) => {
                    self.prompter.say(&format!("  Loaded: {}", descriptor.name))?;
                    self.prompter
                        .say(&render_preview(&table, self.settings.preview_rows)?)?;
                    tables.push(Arc::new(table));
                }
                Err(e) => {
                    warn!("Failed to load {}: {}", descriptor.name, e);
                    self.prompter
                        .say(&format!("  Failed to load {}: {}", descriptor.name, e))?;
                }
            }
        }

        if tables.is_empty() {
            self.transition(RequestState::Error)?;
            self.transition(RequestState::SelectingFiles)?;
        } else {
            self.transition(RequestState::SelectingChartKind)?;
        }
        Ok(tables)
    }

    fn select_mode(&mut self) -> Result<Option<MultiFileMode>> {
        let labels: Vec<String> = MultiFileMode::ALL
            .iter()
            .map(|mode| mode.label().to_string())
            .collect();
        let picked = self
            .prompter
            .select("How do you want to visualize these files?", &labels, 0)?;
        Ok(picked.map(|idx| MultiFileMode::ALL[idx]))
    }

    fn select_kind(&mut self, kinds: &[ChartKind]) -> Result<Option<ChartKind>> {
        let labels: Vec<String> = kinds.iter().map(|k| k.label().to_string()).collect();
        let picked = self
            .prompter
            .select("Select visualization type:", &labels, 0)?;
        Ok(picked.map(|idx| kinds[idx]))
    }

    /// Chart-after-chart loop for a single table
    fn interactive(&mut self, table: &Arc<Table>) -> Result<()> {
        loop {
            self.begin_request()?;
            let Some(kind) = self.select_kind(&ChartKind::ALL)? else {
                break;
            };
            self.transition(RequestState::MappingColumns)?;

            let request = match self.configure(kind, table)? {
                Configured::Request(request) => request,
                Configured::Unavailable(reason) => {
                    self.prompter.say(&reason)?;
                    self.transition(RequestState::Error)?;
                    continue;
                }
                Configured::Quit => break,
            };

            if !self.finish_request(&request)? {
                continue;
            }

            match self
                .prompter
                .confirm("Create another visualization for this file?", false)?
            {
                Some(true) => continue,
                _ => break,
            }
        }
        Ok(())
    }

    /// Validate and render; mapping and render failures are reported, not raised
    fn finish_request(&mut self, request: &ChartRequest) -> Result<bool> {
        let chart = match validate(request) {
            Ok(chart) => chart,
            Err(e) => {
                warn!("Chart request rejected: {}", e);
                self.prompter.say(&format!("Cannot create chart: {e}"))?;
                self.transition(RequestState::Error)?;
                return Ok(false);
            }
        };
        self.transition(RequestState::Validated)?;

        match self.renderer.render(&chart) {
            Ok(RenderOutput::File(path)) => {
                self.prompter
                    .say(&format!("{} saved as: {}", chart.kind, path.display()))?;
            }
            Ok(RenderOutput::Text(text)) => self.prompter.say(&text)?,
            Err(e) => {
                warn!("Rendering failed: {:#}", e);
                self.prompter
                    .say(&format!("Error creating visualization: {e:#}"))?;
                self.transition(RequestState::Error)?;
                return Ok(false);
            }
        }
        self.transition(RequestState::Rendered)?;
        Ok(true)
    }

    fn select_column(&mut self, message: &str, columns: &[String], default: usize) -> Result<Option<String>> {
        Ok(self
            .prompter
            .select(message, columns, default)?
            .map(|idx| columns[idx].clone()))
    }

    fn ask_row_count(&mut self) -> Result<Option<usize>> {
        loop {
            let Some(answer) = self
                .prompter
                .text("Number of rows to display:", &DEFAULT_TABLE_ROWS.to_string())?
            else {
                return Ok(None);
            };
            match answer.trim().parse::<usize>() {
                Ok(rows) if rows > 0 => return Ok(Some(rows)),
                _ => self.prompter.say("Please enter a positive number")?,
            }
        }
    }

    /// Ask for the roles and title of a chart over `table`
    fn configure(&mut self, kind: ChartKind, table: &Arc<Table>) -> Result<Configured> {
        self.prompter.say(&format!("\n{kind} Configuration:"))?;
        let request = ChartRequest::new(kind, table.clone());

        let request = match kind {
            ChartKind::Line | ChartKind::Bar => {
                let x_columns = available_columns(table, ColumnRole::X);
                let y_columns = available_columns(table, ColumnRole::Y);
                if y_columns.is_empty() {
                    return Ok(Configured::Unavailable(format!(
                        "{} has no numeric column for the Y-axis",
                        table.name()
                    )));
                }

                let Some(x) = self.select_column("Select X-axis column:", &x_columns, 0)? else {
                    return Ok(Configured::Quit);
                };
                let Some(y) = self.select_column("Select Y-axis column:", &y_columns, 0)? else {
                    return Ok(Configured::Quit);
                };

                let mut categories = vec!["(none)".to_string()];
                categories.extend(
                    available_columns(table, ColumnRole::Category)
                        .into_iter()
                        .filter(|c| *c != x && *c != y),
                );
                let Some(category) = self.prompter.select("Group by column:", &categories, 0)? else {
                    return Ok(Configured::Quit);
                };

                let mut request = request.with_role(ColumnRole::X, x).with_role(ColumnRole::Y, y);
                if category > 0 {
                    request = request.with_role(ColumnRole::Category, categories[category].clone());
                }
                request
            }
            ChartKind::Histogram => {
                let columns = available_columns(table, ColumnRole::Value);
                if columns.is_empty() {
                    return Ok(Configured::Unavailable(format!(
                        "{} has no numeric column to analyze",
                        table.name()
                    )));
                }
                let Some(column) = self.select_column("Select column to analyze:", &columns, 0)? else {
                    return Ok(Configured::Quit);
                };
                request.with_role(ColumnRole::Value, column)
            }
            ChartKind::Table => {
                let Some(rows) = self.ask_row_count()? else {
                    return Ok(Configured::Quit);
                };
                request.with_row_limit(rows)
            }
        };

        let default_title = match (kind, request.mapping.get(&ColumnRole::Value)) {
            (ChartKind::Histogram, Some(column)) => format!("Histogram of {column}"),
            _ => kind.label().to_string(),
        };
        let Some(title) = self.prompter.text("Chart title:", &default_title)? else {
            return Ok(Configured::Quit);
        };

        Ok(Configured::Request(request.with_title(title)))
    }

    fn run_same_for_all(&mut self, tables: &[Arc<Table>]) -> Result<()> {
        self.prompter
            .say("\nAll files will use the SAME visualization type and configuration")?;
        let Some(kind) = self.select_kind(&ChartKind::ALL)? else {
            return Ok(());
        };
        self.transition(RequestState::MappingColumns)?;

        let template = match self.configure(kind, &tables[0])? {
            Configured::Request(request) => request,
            Configured::Unavailable(reason) => {
                self.prompter.say(&reason)?;
                return Ok(());
            }
            Configured::Quit => return Ok(()),
        };

        self.prompter
            .say(&format!("\nCreating {} for all {} files...", kind, tables.len()))?;
        for (idx, table) in tables.iter().enumerate() {
            self.prompter.say(&format!(
                "\nFile {}/{}: {}",
                idx + 1,
                tables.len(),
                table.name()
            ))?;
            if idx > 0 {
                self.begin_request()?;
                self.transition(RequestState::MappingColumns)?;
            }
            self.finish_request(&template.for_table(table.clone()))?;
        }
        Ok(())
    }

    fn run_different_per_file(&mut self, tables: &[Arc<Table>]) -> Result<()> {
        self.prompter
            .say("\nEach file will have its own visualization configuration")?;
        for (idx, table) in tables.iter().enumerate() {
            self.prompter.say(&format!(
                "\nFile {}/{}: {}",
                idx + 1,
                tables.len(),
                table.name()
            ))?;
            self.interactive(table)?;
        }
        Ok(())
    }

    fn run_comparison(&mut self, tables: &[Arc<Table>]) -> Result<()> {
        self.prompter
            .say("\nComparison mode: all files in one visualization")?;

        let x_columns = available_shared_columns(tables, ColumnRole::X);
        if x_columns.is_empty() {
            self.prompter.say("No common columns found across all files")?;
            return Ok(());
        }
        self.prompter
            .say(&format!("Common columns: {}", x_columns.join(", ")))?;

        let y_columns = available_shared_columns(tables, ColumnRole::Y);
        if y_columns.is_empty() {
            self.prompter
                .say("No common numeric column to compare across all files")?;
            return Ok(());
        }

        let kinds: Vec<ChartKind> = ChartKind::ALL
            .into_iter()
            .filter(ChartKind::supports_comparison)
            .collect();
        let Some(kind) = self.select_kind(&kinds)? else {
            return Ok(());
        };
        self.transition(RequestState::MappingColumns)?;

        let Some(x) = self.select_column("X-axis:", &x_columns, 0)? else {
            return Ok(());
        };
        let Some(y) = self.select_column("Y-axis to compare:", &y_columns, 0)? else {
            return Ok(());
        };

        info!("Comparing {} across {} files", y, tables.len());
        let request = ChartRequest::comparison(kind, tables.to_vec())
            .with_role(ColumnRole::X, x)
            .with_role(ColumnRole::Y, y);
        self.finish_request(&request)?;
        Ok(())
    }
}
