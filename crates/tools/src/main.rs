use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formats::SkyPackage;
use foundation::math::Rotation;
use skymap::SkyMapConfig;
use tools::{LocalizationInput, ManifestInputs, RenderOptions, render_package, write_manifest};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sky map package tools")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a package to SVG.
    Render {
        /// Package directory containing skymap.json
        package: PathBuf,

        #[arg(long, default_value = "skymap.svg")]
        out: PathBuf,

        #[arg(long, default_value_t = 800.0)]
        width: f64,

        #[arg(long, default_value_t = 600.0)]
        height: f64,

        /// View rotation as "lambda,phi,gamma" in degrees
        #[arg(long, value_parser = parse_rotation, allow_hyphen_values = true)]
        rotation: Option<Rotation>,

        /// JSON file with widget tunables
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Hash the listed files and write skymap.json.
    Manifest {
        /// Package directory; file paths are relative to it
        dir: PathBuf,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, requires_all = ["dateobs", "localization_name"])]
        localization: Option<String>,

        #[arg(long, default_value_t = 1)]
        localization_id: u64,

        #[arg(long)]
        dateobs: Option<String>,

        #[arg(long)]
        localization_name: Option<String>,

        #[arg(long)]
        sources: Option<String>,

        #[arg(long)]
        galaxies: Option<String>,

        #[arg(long)]
        observations: Option<String>,

        #[arg(long)]
        instrument: Option<String>,
    },
    /// Load a package, verify content hashes and parse every file.
    Verify { package: PathBuf },
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    let rotation = match parts.as_slice() {
        [lambda, phi] => Rotation::new(*lambda, *phi, 0.0),
        [lambda, phi, gamma] => Rotation::new(*lambda, *phi, *gamma),
        _ => return Err("expected \"lambda,phi\" or \"lambda,phi,gamma\"".to_string()),
    };
    if !rotation.is_finite() {
        return Err("rotation must be finite".to_string());
    }
    Ok(rotation)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Args::parse().command {
        Command::Render {
            package,
            out,
            width,
            height,
            rotation,
            config,
        } => {
            let config = match config {
                Some(path) => SkyMapConfig::from_path(path)?,
                None => SkyMapConfig::default(),
            };
            let options = RenderOptions {
                width,
                height,
                rotation,
                config,
            };
            let doc = render_package(&package, &options)?;
            fs::write(&out, doc.to_string())?;
            info!(out = %out.display(), "wrote svg");
        }
        Command::Manifest {
            dir,
            name,
            localization,
            localization_id,
            dateobs,
            localization_name,
            sources,
            galaxies,
            observations,
            instrument,
        } => {
            let localization = match (localization, dateobs, localization_name) {
                (Some(path), Some(dateobs), Some(localization_name)) => Some(LocalizationInput {
                    id: localization_id,
                    dateobs,
                    localization_name,
                    path,
                }),
                _ => None,
            };
            let inputs = ManifestInputs {
                name,
                localization,
                sources,
                galaxies,
                observations,
                instrument,
            };
            write_manifest(&dir, &inputs)?;
        }
        Command::Verify { package } => {
            let package = SkyPackage::load(&package)?;
            let data = package.load_data()?;
            println!(
                "ok: localization={} sources={} galaxies={} observations={} fields={}",
                data.localization.as_ref().map_or(0, |c| c.features.len()),
                data.sources.as_ref().map_or(0, |s| s.len()),
                data.galaxies.as_ref().map_or(0, |s| s.len()),
                data.observations.as_ref().map_or(0, |s| s.len()),
                data.instrument.as_ref().map_or(0, |i| i.fields().len()),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_rotation;
    use foundation::math::Rotation;
    use pretty_assertions::assert_eq;

    #[test]
    fn rotation_argument_forms() {
        assert_eq!(parse_rotation("-40,20"), Ok(Rotation::new(-40.0, 20.0, 0.0)));
        assert_eq!(parse_rotation("1, 2, 3"), Ok(Rotation::new(1.0, 2.0, 3.0)));
        assert!(parse_rotation("1").is_err());
        assert!(parse_rotation("a,b").is_err());
        assert!(parse_rotation("inf,0").is_err());
    }
}
