//! File selection front end

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::{debug, info, warn};
use vz_core::RequestState;
use vz_data::{is_supported_path, FileDescriptor};
use vz_views::ChartRenderer;
use walkdir::WalkDir;

use crate::prompt::Prompter;
use crate::settings::Settings;
use crate::workflow::VisualizationWorkflow;

const BANNER: &str = r"
   __      ___                 _ _
   \ \    / (_)               | (_)
    \ \  / / _ ___ _   _  __ _| |_ _______
     \ \/ / | / __| | | |/ _` | | |_  / _ \
      \  /  | \__ \ |_| | (_| | | |/ /  __/
       \/   |_|___/\__,_|\__,_|_|_/___\___|
";

/// Interactive command-line session
pub struct Cli {
    settings: Settings,
}

impl Cli {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn intro(&self, prompter: &mut impl Prompter) -> Result<()> {
        let separator = "=".repeat(50);
        prompter.say(BANNER)?;
        prompter.say(&format!(
            "{:^50}",
            "Visualize is a toolchain for data visualization"
        ))?;
        prompter.say(&separator)?;
        prompter.say("Actions:\n\tAnswer with the number of a choice\n\tPress [Enter] for the default\n\tType q to exit")?;
        prompter.say(&separator)?;
        Ok(())
    }

    /// Supported files of the data directory, sorted and capped at `max_files`
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.settings.data_dir;
        if !dir.is_dir() {
            bail!("{}: path does not exist", dir.display());
        }

        let mut walker = WalkDir::new(dir).min_depth(1).follow_links(true);
        if !self.settings.recursive {
            walker = walker.max_depth(1);
        }

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_supported_path(path))
            .collect();
        files.sort();

        if files.len() > self.settings.max_files {
            info!(
                "Listing the first {} of {} files",
                self.settings.max_files,
                files.len()
            );
            files.truncate(self.settings.max_files);
        }
        if files.is_empty() {
            bail!("{}: folder does not include any supported file", dir.display());
        }

        Ok(files)
    }

    /// Classify paths, reporting and dropping those that cannot be used
    pub fn describe_files(&self, paths: &[PathBuf], prompter: &mut impl Prompter) -> Result<Vec<FileDescriptor>> {
        let mut descriptors = Vec::with_capacity(paths.len());
        for path in paths {
            match FileDescriptor::open(path) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    prompter.say(&format!("Skipping {}: {}", path.display(), e))?;
                }
            }
        }
        Ok(descriptors)
    }

    /// Ask which listed files to visualize; `None` when the user quits
    pub fn select_files(&self, prompter: &mut impl Prompter) -> Result<Option<Vec<FileDescriptor>>> {
        let files = self.list_files()?;
        let names: Vec<String> = files
            .iter()
            .map(|path| display_name(path, &self.settings.data_dir))
            .collect();

        let Some(picked) = prompter.multi_select("Select file/files to visualize:", &names)? else {
            return Ok(None);
        };
        let chosen: Vec<PathBuf> = picked.into_iter().map(|idx| files[idx].clone()).collect();
        self.describe_files(&chosen, prompter).map(Some)
    }

    /// Run a full session; `paths` given on the command line skip the first file menu
    ///
    /// Returns to the file menu whenever nothing usable was selected or loaded,
    /// until the user quits or a request completes.
    pub fn run<P: Prompter, R: ChartRenderer>(
        &self,
        prompter: &mut P,
        renderer: &mut R,
        paths: &[PathBuf],
    ) -> Result<()> {
        self.intro(prompter)?;

        let mut pending = paths.to_vec();
        loop {
            let selected = if pending.is_empty() {
                self.select_files(prompter)?
            } else {
                Some(self.describe_files(&std::mem::take(&mut pending), prompter)?)
            };

            let files = match selected {
                Some(files) if !files.is_empty() => files,
                Some(_) => {
                    prompter.say("No usable file selected. Please choose again.")?;
                    continue;
                }
                None => {
                    prompter.say("User exit")?;
                    return Ok(());
                }
            };

            let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
            prompter.say(&format!("\nSelected: {}", names.join(", ")))?;
            info!("Starting visualization of {} file(s)", files.len());

            let mut workflow = VisualizationWorkflow::new(&self.settings, prompter, renderer);
            workflow.run(&files)?;
            let state = workflow.state();
            debug!("Session finished in state: {}", state);
            if state != RequestState::SelectingFiles {
                return Ok(());
            }
            prompter.say("Returning to file selection")?;
        }
    }
}

fn display_name(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
