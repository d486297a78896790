//! Command-line arguments and the run configuration built from them.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bezmesh::{InputFormat, Subdivision, SubdivisionMethod};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bezmesh")]
#[command(about = "Tessellate Bezier patch files into triangle meshes", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Input file: .bez patches or .obj mesh
    pub input: PathBuf,

    /// Step size (uniform) or error threshold (adaptive)
    pub parameter: f64,

    /// Use adaptive subdivision
    #[arg(short = 'a', long, conflicts_with = "method")]
    pub adaptive: bool,

    /// Subdivision method: uniform or adaptive
    #[arg(long)]
    pub method: Option<String>,

    /// Write the tessellated triangles to this .obj file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print a JSON summary to stdout
    #[arg(long)]
    pub stats: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything a run needs, resolved and validated up front.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Input path.
    pub input: PathBuf,
    /// Input kind, from the extension.
    pub format: InputFormat,
    /// Tessellator and its parameters.
    pub subdivision: Subdivision,
    /// Where to export, if anywhere.
    pub output: Option<PathBuf>,
    /// Print a JSON summary.
    pub stats: bool,
}

impl RunConfig {
    /// Resolve parsed arguments into a run configuration.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let format = InputFormat::from_path(&cli.input)?;

        let method = match (&cli.method, cli.adaptive) {
            (Some(name), _) => name
                .parse::<SubdivisionMethod>()
                .context("invalid subdivision method")?,
            (None, true) => SubdivisionMethod::Adaptive,
            (None, false) => SubdivisionMethod::Uniform,
        };
        let subdivision = Subdivision::new(method, cli.parameter);

        if format == InputFormat::Obj && cli.output.is_some() {
            bail!(
                "cannot export {}: -o only applies to .bez input",
                cli.input.display()
            );
        }
        if format == InputFormat::Bez {
            subdivision
                .validate()
                .with_context(|| format!("invalid {} parameter {}", method, cli.parameter))?;
        }

        Ok(Self {
            input: cli.input.clone(),
            format,
            subdivision,
            output: cli.output.clone(),
            stats: cli.stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bezmesh::{AdaptiveSettings, UniformSettings};

    fn config(args: &[&str]) -> Result<RunConfig> {
        let cli = Cli::try_parse_from(std::iter::once("bezmesh").chain(args.iter().copied()))?;
        RunConfig::from_cli(&cli)
    }

    #[test]
    fn test_uniform_default() {
        let cfg = config(&["teapot.bez", "0.1"]).unwrap();
        assert_eq!(cfg.format, InputFormat::Bez);
        assert_eq!(cfg.subdivision, Subdivision::Uniform(UniformSettings::new(0.1)));
        assert!(cfg.output.is_none());
        assert!(!cfg.stats);
    }

    #[test]
    fn test_adaptive_flag_anywhere() {
        let expected = Subdivision::Adaptive(AdaptiveSettings::new(0.01));
        assert_eq!(config(&["teapot.bez", "0.01", "-a"]).unwrap().subdivision, expected);
        assert_eq!(config(&["-a", "teapot.bez", "0.01"]).unwrap().subdivision, expected);
        assert_eq!(
            config(&["teapot.bez", "0.01", "--method", "adaptive"])
                .unwrap()
                .subdivision,
            expected
        );
    }

    #[test]
    fn test_output_path() {
        let cfg = config(&["teapot.bez", "0.1", "-o", "out.obj", "--stats"]).unwrap();
        assert_eq!(cfg.output, Some(PathBuf::from("out.obj")));
        assert!(cfg.stats);
    }

    #[test]
    fn test_configuration_errors() {
        assert!(config(&["teapot.bez", "0.1", "--method", "spiral"]).is_err());
        assert!(config(&["mesh.obj", "0.1", "-o", "out.obj"]).is_err());
        assert!(config(&["scene.stl", "0.1"]).is_err());
        assert!(config(&["teapot.bez", "-0.5"]).is_err());
        assert!(config(&["teapot.bez", "zero"]).is_err());
        assert!(config(&["teapot.bez"]).is_err());
        assert!(config(&["teapot.bez", "0.1", "-a", "--method", "uniform"]).is_err());
    }

    #[test]
    fn test_obj_input_ignores_parameter_range() {
        let cfg = config(&["mesh.obj", "0"]).unwrap();
        assert_eq!(cfg.format, InputFormat::Obj);
    }
}
