use chrono::Local;
use colored::Colorize;
use std::cell::Cell;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Error,
    Fatal,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        })
    }
}

/// Session logger writing each entry to the console and appending it to a
/// timestamped log file.
///
/// Entry format: `[timestamp] [LEVEL] tag:\tmessage`. The `tag` names the
/// call site (e.g. `git.run`) and is passed explicitly by the caller.
///
/// On the first entry of a session the logger appends two blank lines to the
/// file and records its own log file path as an INFO entry, so consecutive
/// sessions in the same file are visually separated.
pub struct Logger {
    log_file_path: PathBuf,
    log_to_console: bool,
    log_to_file: bool,
    first_message_logged: Cell<bool>,
}

/// Build a timestamped log file name: `<base>.<%Y-%m-%d_%H:%M:%S>.log`.
pub fn log_file_name(base: &str) -> String {
    format!("{}.{}.log", base, Local::now().format("%Y-%m-%d_%H:%M:%S"))
}

impl Logger {
    pub fn new(log_dir: &Path, base_name: &str) -> Logger {
        Logger {
            log_file_path: log_dir.join(log_file_name(base_name)),
            log_to_console: true,
            log_to_file: true,
            first_message_logged: Cell::new(false),
        }
    }

    pub fn log_file_path(&self) -> &Path {
        &self.log_file_path
    }

    pub fn info(&self, tag: &str, message: &str) {
        self.write(Level::Info, tag, message);
    }

    pub fn error(&self, tag: &str, message: &str) {
        self.write(Level::Error, tag, message);
    }

    /// Log a FATAL entry and terminate the process with `exit_code`.
    pub fn fatal(&self, tag: &str, message: &str, exit_code: i32) -> ! {
        self.write(Level::Fatal, tag, message);
        process::exit(exit_code)
    }

    fn write(&self, level: Level, tag: &str, message: &str) {
        if !self.first_message_logged.get() {
            self.first_message_logged.set(true);
            self.append_raw("\n\n");
            self.write(
                Level::Info,
                "logger",
                &format!("Log file initialized at: '{}'", self.log_file_path.display()),
            );
        }

        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S:%6f");
        let line = format!("[{stamp}] [{level}] {tag}:\t{message}");

        if self.log_to_file {
            self.append_raw(&format!("{line}\n"));
        }

        if self.log_to_console {
            match level {
                Level::Info => println!("{line}"),
                Level::Error => eprintln!("{}", line.red()),
                Level::Fatal => eprintln!("{}", line.red().bold()),
            }
        }
    }

    // A broken log file must not take the launcher down; the console copy
    // still goes out.
    fn append_raw(&self, text: &str) {
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
        {
            let _ = file.write_all(text.as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn quiet_logger(dir: &Path) -> Logger {
        Logger {
            log_file_path: dir.join(log_file_name("test")),
            log_to_console: false,
            log_to_file: true,
            first_message_logged: Cell::new(false),
        }
    }

    #[test]
    fn log_file_name_embeds_base_and_extension() {
        let name = log_file_name("unity-launch");
        assert!(name.starts_with("unity-launch."));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn file_is_created_in_the_configured_directory() {
        let td = tempdir().unwrap();
        let logger = quiet_logger(td.path());
        logger.info("test", "hello");
        assert!(logger.log_file_path().starts_with(td.path()));
        assert!(logger.log_file_path().is_file());
    }

    #[test]
    fn two_entries_append_two_lines_plus_one_time_init() {
        let td = tempdir().unwrap();
        let logger = quiet_logger(td.path());

        logger.info("test", "first");
        logger.info("test", "second");

        let content = fs::read_to_string(logger.log_file_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        // Two blank separator lines, one init entry, then the two messages.
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "");
        assert!(lines[2].contains("Log file initialized at:"));
        assert!(lines[3].ends_with("\tfirst"));
        assert!(lines[4].ends_with("\tsecond"));
    }

    #[test]
    fn entries_carry_level_and_tag() {
        let td = tempdir().unwrap();
        let logger = quiet_logger(td.path());

        logger.info("alpha.beta", "msg one");
        logger.error("alpha.beta", "msg two");

        let content = fs::read_to_string(logger.log_file_path()).unwrap();
        assert!(content.contains("[INFO] alpha.beta:\tmsg one"));
        assert!(content.contains("[ERROR] alpha.beta:\tmsg two"));
    }
}
