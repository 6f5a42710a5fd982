//! Command-line front end over the opener and the config store.
//!
//! Opening runs on a blocking worker; progress and errors come back over a
//! channel and are printed as they arrive.

use std::time::Duration;

use clap::Subcommand;
use tokio::sync::mpsc;

use crate::config::ConfigManager;
use crate::error::{AppError, Result};
use crate::i18n::{self, t, t_with};
use crate::models::{ErrorEvent, ErrorKind, ProgressEvent, WindowRect};
use crate::opener::Reporter;
use crate::paths::validate_paths;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open every folder of a tab group as tabs of one window
    OpenGroup {
        name: String,
        /// Per-step wait limit in seconds (defaults to the saved setting)
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Open one folder in a new window and record it in history
    Open { path: String },
    /// Report which paths can be opened
    Validate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the frontmost Finder/Explorer window rect
    FrontmostRect {
        /// Save the rect on this tab group
        #[arg(long)]
        group: Option<String>,
    },
    /// List tab groups
    Groups,
    GroupAdd { name: String },
    GroupDelete { name: String },
    GroupRename { old_name: String, new_name: String },
    GroupCopy { name: String },
    /// Move a tab group to another position (0-based)
    GroupMove { from: usize, to: usize },
    GroupAddPath { group: String, path: String },
    GroupRemovePath { group: String, index: usize },
    GroupMovePath { group: String, from: usize, to: usize },
    /// Show history, or clear it
    History {
        #[arg(long)]
        clear: bool,
        /// Also drop pinned entries
        #[arg(long, requires = "clear")]
        all: bool,
    },
    /// Toggle the pin on a history entry
    Pin { path: String },
    /// Show or set the interface language (en, ja)
    Language { code: Option<String> },
    /// Show or set the default open timeout in seconds
    Timeout { secs: Option<u64> },
}

/// What the opener worker sends back to the printing task.
#[derive(Debug, Clone)]
pub enum ShellEvent {
    Progress(ProgressEvent),
    Error(ErrorEvent),
}

pub async fn run(command: Command, config: &mut ConfigManager) -> Result<()> {
    match command {
        Command::OpenGroup { name, timeout } => {
            let timeout = timeout.map(Duration::from_secs).unwrap_or_else(|| config.timeout());
            open_group(config, &name, timeout).await
        }
        Command::Open { path } => open_path(config, &path).await,
        Command::Validate { paths } => {
            let (valid, invalid) = validate_paths(&paths);
            for path in valid {
                println!("ok       {}", path);
            }
            for path in invalid {
                println!("invalid  {}", path);
            }
            Ok(())
        }
        Command::FrontmostRect { group } => frontmost_rect(config, group.as_deref()).await,
        Command::Groups => {
            for group in &config.data.tab_groups {
                match group.window_rect() {
                    Some(rect) => println!(
                        "{} ({} paths, {})",
                        group.name,
                        group.paths.len(),
                        describe_rect(rect)
                    ),
                    None => println!("{} ({} paths)", group.name, group.paths.len()),
                }
                for (i, path) in group.paths.iter().enumerate() {
                    println!("  [{}] {}", i, path);
                }
            }
            Ok(())
        }
        Command::History { clear, all } => {
            if clear {
                config.clear_history(!all);
                return config.save();
            }
            let entries = config.sorted_history();
            if entries.is_empty() {
                println!("{}", t("history.empty"));
            }
            for entry in entries {
                let pin = if entry.pinned { "*" } else { " " };
                println!("{} {}  {} ({}x)", pin, entry.last_used, entry.path, entry.use_count);
            }
            Ok(())
        }
        Command::Pin { path } => match config.toggle_pin(&path) {
            Some(pinned) => {
                println!("{} pinned={}", path, pinned);
                config.save()
            }
            None => Err(AppError::InvalidInput {
                message: format!("Not in history: {}", path),
            }),
        },
        Command::Language { code } => {
            match code {
                Some(code) => {
                    let language = i18n::Language::from_code(&code).ok_or_else(|| {
                        AppError::InvalidInput {
                            message: format!("Unsupported language: {}", code),
                        }
                    })?;
                    config.set_language(language.code());
                    i18n::set_language(language);
                    config.save()?;
                }
                None => {
                    let current = i18n::language();
                    for language in i18n::Language::ALL {
                        println!("{}", language_line(language, current));
                    }
                }
            }
            Ok(())
        }
        Command::Timeout { secs } => {
            match secs {
                Some(secs) => {
                    config.set_timeout(secs);
                    config.save()?;
                }
                None => println!("{}", config.timeout().as_secs()),
            }
            Ok(())
        }
        other => {
            edit_groups(config, other)?;
            config.save()
        }
    }
}

/// Tab-group mutations that need nothing but the config store.
fn edit_groups(config: &mut ConfigManager, command: Command) -> Result<()> {
    match command {
        Command::GroupAdd { name } => {
            if config.tab_group(&name).is_some() {
                return Err(AppError::InvalidInput {
                    message: t("tab.duplicate_msg"),
                });
            }
            config.add_tab_group(&name)?;
        }
        Command::GroupDelete { name } => {
            require_group(config, &name)?;
            config.delete_tab_group(&name);
        }
        Command::GroupRename { old_name, new_name } => {
            config.rename_tab_group(&old_name, &new_name)?
        }
        Command::GroupCopy { name } => {
            let copy = config.copy_tab_group(&name)?;
            println!("{}", copy.name);
        }
        Command::GroupMove { from, to } => config.move_tab_group(from, to),
        Command::GroupAddPath { group, path } => config.add_path_to_group(&group, &path)?,
        Command::GroupRemovePath { group, index } => {
            if config.remove_path_from_group(&group, index)?.is_none() {
                log::warn!("No path at index {} in '{}'", index, group);
            }
        }
        Command::GroupMovePath { group, from, to } => config.move_path_in_group(&group, from, to)?,
        other => {
            return Err(AppError::InvalidInput {
                message: format!("Not a tab group command: {:?}", other),
            })
        }
    }
    Ok(())
}

fn require_group(config: &ConfigManager, name: &str) -> Result<()> {
    if config.tab_group(name).is_none() {
        return Err(AppError::InvalidInput {
            message: t_with("tab.no_tab_msg", &[("name", name)]),
        });
    }
    Ok(())
}

fn describe_rect(rect: WindowRect) -> String {
    format!("{}x{}+{}+{}", rect.width, rect.height, rect.x, rect.y)
}

/// One row of the `language` listing; the active language is starred.
fn language_line(language: i18n::Language, current: i18n::Language) -> String {
    let marker = if language == current { '*' } else { ' ' };
    format!("{} {}  {}", marker, language.code(), language.display_name())
}

/// Render one worker event as a console line.
pub fn format_event(event: &ShellEvent) -> String {
    match event {
        ShellEvent::Progress(p) => t_with(
            "status.progress",
            &[
                ("current", &p.current.to_string()),
                ("total", &p.total.to_string()),
                ("path", &p.path),
            ],
        ),
        ShellEvent::Error(e) => match e.kind {
            ErrorKind::AccessibilityRequired => e.message.clone(),
            ErrorKind::Generic => {
                t_with("error.open_failed", &[("path", &e.path), ("error", &e.message)])
            }
        },
    }
}

async fn open_group(config: &ConfigManager, name: &str, timeout: Duration) -> Result<()> {
    let group = config
        .tab_group(name)
        .cloned()
        .ok_or_else(|| AppError::InvalidInput {
            message: t_with("tab.no_tab_msg", &[("name", name)]),
        })?;
    if group.paths.is_empty() {
        println!("{}", t("tab.no_paths_msg"));
        return Ok(());
    }

    let (valid, invalid) = validate_paths(&group.paths);
    if !invalid.is_empty() {
        eprintln!("{}", t("error.invalid_paths_title"));
        eprintln!("{}", t_with("error.invalid_paths_msg", &[("paths", &invalid.join("\n"))]));
    }
    if valid.is_empty() {
        return Ok(());
    }

    println!("{}", t("status.do_not_touch"));
    let window_rect = group.window_rect();
    let (tx, mut rx) = mpsc::unbounded_channel::<ShellEvent>();

    let worker = tokio::task::spawn_blocking(move || {
        let progress_tx = tx.clone();
        let mut reporter = Reporter::silent()
            .on_progress(move |p| {
                let _ = progress_tx.send(ShellEvent::Progress(p.clone()));
            })
            .on_error(move |e| {
                let _ = tx.send(ShellEvent::Error(e.clone()));
            });
        crate::open_folders_as_tabs(&valid, &mut reporter, timeout, window_rect)
    });

    while let Some(event) = rx.recv().await {
        match &event {
            ShellEvent::Progress(_) => println!("{}", format_event(&event)),
            ShellEvent::Error(_) => eprintln!("{}", format_event(&event)),
        }
    }

    let opened = worker.await.map_err(|e| AppError::InvalidInput {
        message: e.to_string(),
    })?;
    if opened {
        println!("{}", t("status.done"));
        Ok(())
    } else {
        Err(AppError::InvalidInput {
            message: t("error.unsupported_platform"),
        })
    }
}

async fn open_path(config: &mut ConfigManager, path: &str) -> Result<()> {
    let (valid, _) = validate_paths(&[path.to_string()]);
    let Some(target) = valid.into_iter().next() else {
        return Err(AppError::InvalidInput {
            message: t_with("path.invalid_msg", &[("path", path)]),
        });
    };

    let opened = {
        let target = target.clone();
        tokio::task::spawn_blocking(move || crate::open_single_folder(&target, None))
            .await
            .map_err(|e| AppError::InvalidInput {
                message: e.to_string(),
            })?
    };
    if !opened {
        return Err(AppError::InvalidInput {
            message: t_with("error.open_failed", &[("path", &target), ("error", "")]),
        });
    }

    config.add_history(&target);
    config.save()
}

async fn frontmost_rect(config: &mut ConfigManager, group: Option<&str>) -> Result<()> {
    if let Some(name) = group {
        require_group(config, name)?;
    }

    let rect = tokio::task::spawn_blocking(crate::get_frontmost_window_rect)
        .await
        .map_err(|e| AppError::InvalidInput {
            message: e.to_string(),
        })?;
    let Some(rect) = rect else {
        println!("{}", t("window.no_window_msg"));
        return Ok(());
    };

    println!("{}", describe_rect(rect));
    if let Some(name) = group {
        config.set_group_window_rect(name, Some(rect))?;
        config.save()?;
    }
    Ok(())
}
