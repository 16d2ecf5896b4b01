pub(crate) mod convert;
pub(crate) mod utils;

use anyhow::{Context, Result};
use log::{debug, warn};
use std::{fs, io, path::Path};
use structopt::StructOpt;
use walkdir::WalkDir;

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "mqo_asset")]
struct CliArgs {
    /// Input file or folder
    input: String,
    /// Output directory, to place the converted files in
    #[structopt(short = "o", long = "output")]
    output: String,
    /// Fail on malformed blocks instead of skipping them, regardless of meta files
    #[structopt(long = "strict")]
    strict: bool,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

/// Happens during setup
#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Input does not exist: {0}")]
    InputNonExistant(String),
    #[error("Output folder structure could not be created: {0}")]
    ErrorCreatingOutputStructure(#[from] io::Error),
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();

    if !args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    } else {
        env_logger::Builder::new()
            .filter(None, log::LevelFilter::Debug)
            .init();
    }

    prepare(args)
}

fn prepare(args: CliArgs) -> Result<()> {
    let output_path = Path::new(&args.output);

    let input_path = Path::new(&args.input);
    if !input_path.exists() {
        return Err(CliError::InputNonExistant(input_path.display().to_string()).into());
    }

    // a single file input is placed directly in the output folder
    let input_root = if input_path.is_dir() {
        input_path
    } else {
        input_path.parent().unwrap_or_else(|| Path::new(""))
    };

    for entry in WalkDir::new(input_path) {
        let path = match &entry {
            Err(err) => {
                warn!("Error parsing path: {}", err);
                continue;
            }
            Ok(entry) => entry.path(),
        };

        if path.is_dir() {
            continue;
        }

        let output = output_path.join(path.strip_prefix(input_root).with_context(|| {
            format!("Error handling output path for {}", path.display())
        })?);

        // check extension
        if let Some(Some(extension)) = path.extension().map(|x| x.to_str()) {
            match extension.to_ascii_lowercase().as_ref() {
                "mqo" => {
                    // creating the output folder of the input file in the same structure
                    let local_output_folder = output.parent().unwrap_or(output_path);
                    if !local_output_folder.exists() {
                        fs::create_dir_all(local_output_folder)
                            .map_err(CliError::ErrorCreatingOutputStructure)?;
                    }

                    convert::process(path, local_output_folder, args.strict)?
                }
                "toml" => debug!("Ignored toml file: {}", &path.display()),
                _ => warn!("Could not handle path: {}", &path.display()),
            }
        } else {
            warn!(
                "Ignored file \"{}\", because no file extension was found.",
                path.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const MODEL: &str = "Metasequoia Document
Format Text Ver 1.0
Object \"line\" {
	vertex 2 {
		0 0 0
		1 1 1
	}
	face 1 {
		2 V(0 1)
	}
}
";

    fn args(input: &Path, output: &Path) -> CliArgs {
        CliArgs {
            input: input.display().to_string(),
            output: output.display().to_string(),
            strict: false,
            verbose: false,
        }
    }

    #[test]
    fn test_prepare_folder() -> Result<()> {
        let input = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        fs::create_dir_all(input.path().join("props/small"))?;
        fs::write(input.path().join("props/small/line.MQO"), MODEL)?;
        fs::write(input.path().join("root.mqo"), MODEL)?;
        fs::write(input.path().join("notes.txt"), "not a model")?;

        prepare(args(input.path(), output.path()))?;

        assert!(output.path().join("props/small/line.obj").exists());
        assert!(output.path().join("props/small/line.mtl").exists());
        assert!(output.path().join("root.obj").exists());
        assert!(!output.path().join("notes.txt").exists());

        Ok(())
    }

    #[test]
    fn test_prepare_file() -> Result<()> {
        let input = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        let model = input.path().join("line.mqo");
        fs::write(&model, MODEL)?;

        prepare(args(&model, output.path()))?;

        assert_eq!(
            fs::read_to_string(output.path().join("line.obj"))?,
            "mtllib line.mtl
v 0.000000 0.000000 0.000000
v 1.000000 1.000000 1.000000
o line
g line
f 1 2
"
        );
        assert_eq!(fs::read_to_string(output.path().join("line.mtl"))?, "");

        Ok(())
    }

    #[test]
    fn test_missing_input() {
        let output = tempfile::tempdir().unwrap();
        let missing = output.path().join("missing");

        assert!(prepare(args(&missing, output.path())).is_err());
    }
}
