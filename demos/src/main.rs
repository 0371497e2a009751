// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use launchcfg::{
    decode_button_with, parse_config_from_slice_with, ButtonMatch, Buttons, LaunchArgs, LaunchError,
    ParseError, ParseOptions,
};
use log::{debug, info};

const DEFAULT_CONFIG: &str = "arm9launcher.cfg";

/// Pick the payload to chain-load for a set of held buttons.
#[derive(Parser, Debug)]
#[command(name = "launchsel", version)]
struct Args {
    /// Directory to search for the config file; repeat to search several
    /// in order. Defaults to the current directory.
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Config file name looked up under each root.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CONFIG)]
    config: String,

    /// Require button names in the config to match exactly.
    #[arg(long)]
    exact_buttons: bool,

    /// Held buttons, e.g. `R Start`. None held if omitted.
    #[arg(value_name = "BUTTON")]
    buttons: Vec<String>,
}

#[derive(Debug)]
enum CliError {
    NotFound(String),
    Read(PathBuf, std::io::Error),
    Parse(PathBuf, ParseError),
    UnknownButton(String),
    NoMatch(Buttons),
    Launch(LaunchError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound(name) => write!(f, "could not find {name} in any root"),
            CliError::Read(path, e) => write!(f, "unable to read '{}': {e}", path.display()),
            CliError::Parse(path, e) => write!(f, "'{}': {e}", path.display()),
            CliError::UnknownButton(name) => write!(f, "unknown button '{name}'"),
            CliError::NoMatch(held) => {
                write!(f, "failed to identify payload to launch (held: {held})")
            }
            CliError::Launch(e) => write!(f, "cannot launch: {e}"),
        }
    }
}

/// First `root/name` that exists as a file.
fn find_config(roots: &[PathBuf], name: &str) -> Option<PathBuf> {
    roots.iter().map(|root| root.join(name)).find(|path| {
        debug!("looking for {}", path.display());
        path.is_file()
    })
}

fn held_buttons(names: &[String]) -> Result<Buttons, CliError> {
    names.iter().try_fold(Buttons::empty(), |held, name| {
        decode_button_with(name, ButtonMatch::Exact)
            .map(|flag| held | flag)
            .ok_or_else(|| CliError::UnknownButton(name.clone()))
    })
}

fn run(args: &Args) -> Result<(String, String), CliError> {
    let roots = if args.roots.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.roots.clone()
    };
    let path =
        find_config(&roots, &args.config).ok_or_else(|| CliError::NotFound(args.config.clone()))?;
    info!("using {}", path.display());

    let raw = read_config(&path)?;
    let mut options = ParseOptions::new();
    if args.exact_buttons {
        options = options.with_button_match(ButtonMatch::Exact);
    }
    let config = parse_config_from_slice_with(&raw, options)
        .map_err(|e| CliError::Parse(path.clone(), e))?;

    let held = held_buttons(&args.buttons)?;
    let entry = config.select(held).ok_or(CliError::NoMatch(held))?;
    let launch = LaunchArgs::new(entry).map_err(CliError::Launch)?;
    Ok((launch.payload().to_string(), launch.offset().to_string()))
}

/// Raw file contents; UTF-8 is checked by the parser.
fn read_config(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|e| CliError::Read(path.to_path_buf(), e))
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok((payload, offset)) => {
            println!("{payload}");
            println!("{offset}");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchcfg::SemanticError;

    const CONFIG: &str = r#"{"configuration": [
        {"name": "default", "location": "sd:/boot.bin", "buttons": []},
        {"name": "recovery", "location": "sd:/recovery.bin", "offset": 0x200, "buttons": ["R", "Start"]}
    ]}"#;

    const LENIENT: &str = r#"{"configuration": [
        {"name": "default", "location": "sd:/boot.bin", "buttons": ["Nonesuch"]}
    ]}"#;

    fn args(roots: &[&Path], extra: &[&str]) -> Args {
        let mut argv = vec!["launchsel".to_string()];
        for root in roots {
            argv.push("--root".into());
            argv.push(root.display().to_string());
        }
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_first_root_wins() {
        let empty = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join(DEFAULT_CONFIG), CONFIG).unwrap();
        fs::write(second.path().join(DEFAULT_CONFIG), "not json").unwrap();

        let roots = [empty.path(), first.path(), second.path()].map(Path::to_path_buf);
        assert_eq!(
            find_config(&roots, DEFAULT_CONFIG),
            Some(first.path().join(DEFAULT_CONFIG))
        );
        assert_eq!(find_config(&roots[..1], DEFAULT_CONFIG), None);
    }

    #[test]
    fn test_run_selects_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), CONFIG).unwrap();

        let picked = run(&args(&[dir.path()], &["--", "Start", "R"])).unwrap();
        assert_eq!(picked, ("sd:/recovery.bin".to_string(), "512".to_string()));

        let picked = run(&args(&[dir.path()], &[])).unwrap();
        assert_eq!(picked, ("sd:/boot.bin".to_string(), "0".to_string()));
    }

    #[test]
    fn test_run_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), CONFIG).unwrap();
        fs::write(dir.path().join("broken.cfg"), "{").unwrap();
        fs::write(dir.path().join("lenient.cfg"), LENIENT).unwrap();

        assert!(matches!(
            run(&args(&[dir.path()], &["A"])),
            Err(CliError::NoMatch(held)) if held == Buttons::A
        ));
        assert!(matches!(
            run(&args(&[dir.path()], &["Rx"])),
            Err(CliError::UnknownButton(_))
        ));
        assert!(matches!(
            run(&args(&[dir.path()], &["--exact-buttons", "--config", "lenient.cfg"])),
            Err(CliError::Parse(..))
        ));
        assert!(matches!(
            run(&args(&[dir.path()], &["--config", "broken.cfg"])),
            Err(CliError::Parse(..))
        ));
        assert!(matches!(
            run(&args(&[dir.path()], &["--config", "missing.cfg"])),
            Err(CliError::NotFound(_))
        ));
    }

    #[test]
    fn test_non_utf8_location_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let raw = b"{\"configuration\": [{\"name\": \"a\", \"location\": \"sd:/\xff.bin\", \"buttons\": []}]}";
        fs::write(dir.path().join(DEFAULT_CONFIG), raw).unwrap();

        let err = run(&args(&[dir.path()], &[])).unwrap_err();
        assert!(
            matches!(
                err,
                CliError::Parse(_, ParseError::Semantic(SemanticError::InvalidUtf8 { entry: 0, .. }))
            ),
            "got {err:?}"
        );
    }
}
