//! Resolve a server script argument into the command that runs it.

use std::path::Path;

use crate::error::{Error, Result};

const CARGO_MANIFEST: &str = "Cargo.toml";

/// An executable and the arguments to launch it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }
}

/// Map the command-line arguments to a server command.
///
/// The first argument selects the form: `.py` and `.js` scripts run under
/// their interpreter with the arguments unchanged, a directory or a
/// `Cargo.toml` manifest runs as a Cargo project.
pub fn resolve(args: &[String]) -> Result<CommandSpec> {
    let script = args.first().ok_or(Error::MissingArgument)?;

    if script.ends_with(".py") {
        return Ok(CommandSpec::new("python", args.to_vec()));
    }
    if script.ends_with(".js") {
        return Ok(CommandSpec::new("node", args.to_vec()));
    }

    let path = Path::new(script);
    let manifest = if path.is_dir() {
        Some(path.join(CARGO_MANIFEST))
    } else if path.is_file() && path.file_name().is_some_and(|name| name == CARGO_MANIFEST) {
        Some(path.to_path_buf())
    } else {
        None
    };

    match manifest {
        Some(manifest) => Ok(CommandSpec::new(
            "cargo",
            vec![
                "run".into(),
                "--quiet".into(),
                "--manifest-path".into(),
                manifest.to_string_lossy().into_owned(),
            ],
        )),
        None => Err(Error::UnsupportedScript {
            script: script.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn python_script_keeps_arguments() {
        let input = args(&["weather.py", "--verbose", "extra"]);
        let spec = resolve(&input).unwrap();
        assert_eq!(spec.program, "python");
        assert_eq!(spec.args, input);
    }

    #[test]
    fn python_script_need_not_exist() {
        let spec = resolve(&args(&["/nowhere/server.py"])).unwrap();
        assert_eq!(spec.program, "python");
    }

    #[test]
    fn node_script_keeps_arguments() {
        let input = args(&["build/index.js", "--port", "0"]);
        let spec = resolve(&input).unwrap();
        assert_eq!(spec.program, "node");
        assert_eq!(spec.args, input);
    }

    #[test]
    fn directory_runs_as_cargo_project() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().to_string_lossy().into_owned();

        let spec = resolve(&args(&[&script])).unwrap();
        assert_eq!(spec.program, "cargo");
        assert_eq!(
            spec.args,
            args(&[
                "run",
                "--quiet",
                "--manifest-path",
                &dir.path().join("Cargo.toml").to_string_lossy(),
            ])
        );
    }

    #[test]
    fn manifest_file_runs_as_cargo_project() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("Cargo.toml");
        std::fs::write(&manifest, "[package]\nname = \"weather\"\n").unwrap();
        let script = manifest.to_string_lossy().into_owned();

        let spec = resolve(&args(&[&script, "ignored"])).unwrap();
        assert_eq!(spec.program, "cargo");
        assert_eq!(spec.args, args(&["run", "--quiet", "--manifest-path", &script]));
    }

    #[test]
    fn missing_manifest_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("Cargo.toml").to_string_lossy().into_owned();

        let err = resolve(&args(&[&script])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedScript { script: s } if s == script));
    }

    #[test]
    fn unknown_suffix_is_unsupported() {
        let err = resolve(&args(&["server.rb"])).unwrap_err();
        match err {
            Error::UnsupportedScript { script } => assert_eq!(script, "server.rb"),
            other => panic!("expected UnsupportedScript, got {other:?}"),
        }
        let message = resolve(&args(&["server.rb"])).unwrap_err().to_string();
        assert!(message.contains("server.rb"));
    }

    #[test]
    fn no_arguments_is_missing_argument() {
        let err = resolve(&[]).unwrap_err();
        assert!(matches!(err, Error::MissingArgument));
    }
}
