//! Command-line front end: render styled icons, flatten collections, print CSS.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use icon_styler::{
    CollectionIndex, Configurable, DirectorySink, ExportFormat, FLATTEN_BATCH_SIZE, StyleProfile,
    StyleSession, flatten_with,
};

/// Icon styling and export tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a styled icon to a file
    #[command(visible_alias = "r")]
    Render {
        /// Style profile (JSON). Defaults are used when omitted
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        profile: Option<PathBuf>,

        /// Icon to style (SVG)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        icon: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "png")]
        format: ExportFormat,

        /// Output edge length in pixels. Overrides the profile's image size
        #[arg(short, long)]
        size: Option<u32>,

        /// Output directory
        #[arg(short, long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
        out_dir: PathBuf,

        /// Output file name, without extension
        #[arg(short, long, default_value = "icon")]
        name: String,
    },

    /// Print the visible icon names of a collection index, one per line
    #[command(visible_alias = "f")]
    Flatten {
        /// Collection index (JSON)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        index: PathBuf,

        /// Entries processed between two yields
        #[arg(long, default_value_t = FLATTEN_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Print the preview CSS declarations of a profile as JSON
    Css {
        /// Style profile (JSON). Defaults are used when omitted
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        profile: Option<PathBuf>,
    },

    /// Print the JSON schema of style profiles
    #[cfg(feature = "jsonschema")]
    Schema,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(run(cli.command))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            profile,
            icon,
            format,
            size,
            out_dir,
            name,
        } => {
            let mut session = load_session(profile.as_deref())?;
            let svg = fs::read_to_string(&icon)
                .with_context(|| format!("failed to read icon {}", icon.display()))?;
            session.set_icon(Some(svg));
            if let Some(size) = size {
                session.set_image_size(size);
            }

            let sink = DirectorySink::new(&out_dir);
            match session
                .export(format, &name, &sink)
                .await
                .with_context(|| format!("failed to export {format}"))?
            {
                Some(path) => {
                    tracing::info!(path = %path.display(), size = session.image_size(), "exported");
                    println!("{}", path.display());
                }
                None => tracing::warn!(%format, "nothing to export"),
            }
        }

        Commands::Flatten { index, batch_size } => {
            let json = fs::read_to_string(&index)
                .with_context(|| format!("failed to read {}", index.display()))?;
            let index = CollectionIndex::from_json(&json).context("invalid collection index")?;

            for name in flatten_with(&index, batch_size).await {
                println!("{name}");
            }
        }

        Commands::Css { profile } => {
            let session = load_session(profile.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&session.preview())?);
        }

        #[cfg(feature = "jsonschema")]
        Commands::Schema => {
            let schema = schemars::schema_for!(StyleProfile);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn load_session(profile: Option<&Path>) -> Result<StyleSession> {
    let mut session = StyleSession::new();
    if let Some(path) = profile {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        let profile = StyleProfile::import(&json)
            .with_context(|| format!("invalid profile {}", path.display()))?;
        session.apply_profile(&profile);
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults() {
        let cli = Cli::parse_from(["icon-styler", "render", "--icon", "star.svg"]);
        match cli.command {
            Commands::Render {
                profile,
                icon,
                format,
                size,
                out_dir,
                name,
            } => {
                assert!(profile.is_none());
                assert_eq!(icon, PathBuf::from("star.svg"));
                assert_eq!(format, ExportFormat::Png);
                assert!(size.is_none());
                assert_eq!(out_dir, PathBuf::from("."));
                assert_eq!(name, "icon");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn render_accepts_inner_svg_and_alias() {
        let cli = Cli::parse_from([
            "icon-styler", "r", "-i", "a.svg", "-f", "inner-svg", "-s", "64",
        ]);
        match cli.command {
            Commands::Render { format, size, .. } => {
                assert_eq!(format, ExportFormat::InnerSvg);
                assert_eq!(size, Some(64));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flatten_batch_size_defaults() {
        let cli = Cli::parse_from(["icon-styler", "flatten", "index.json"]);
        match cli.command {
            Commands::Flatten { batch_size, .. } => assert_eq!(batch_size, FLATTEN_BATCH_SIZE),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn render_requires_icon() {
        assert!(Cli::try_parse_from(["icon-styler", "render"]).is_err());
    }

    #[tokio::test]
    async fn render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("icon.svg");
        fs::write(
            &icon,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M4 4h16v16H4z"/></svg>"#,
        )
        .unwrap();

        run(Commands::Render {
            profile: None,
            icon,
            format: ExportFormat::Svg,
            size: Some(32),
            out_dir: dir.path().join("out"),
            name: "styled".to_string(),
        })
        .await
        .unwrap();

        let svg = fs::read_to_string(dir.path().join("out").join("styled.svg")).unwrap();
        assert!(svg.contains(r#"width="32" height="32""#));
    }
}
