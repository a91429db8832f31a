#![deny(unsafe_code)]
//! CLI binary for the particle backdrop.
//!
//! Subcommands:
//! - `render`: run the backdrop N frames headlessly, write the last as PNG
//! - `stats`: run N frames, report per-frame particle/pair/link counts
//! - `list`: print edge policies, link styles, and the config schema

mod error;

use backdrop_core::{EdgePolicy, FieldConfig, FrameStats, LinkStyle, RecordingSurface, Seed};
use backdrop_raster::{snapshot, Pixmap, DEFAULT_BACKGROUND};
use clap::{Args, Parser, Subcommand};
use error::CliError;
use log::info;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "backdrop", about = "Particle backdrop CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Everything that determines a run.
#[derive(Args)]
struct SceneArgs {
    /// Viewport width in pixels.
    #[arg(short = 'W', long, default_value_t = 1200)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(short = 'H', long, default_value_t = 800)]
    height: u32,

    /// Number of frames to simulate.
    #[arg(short, long, default_value_t = 120)]
    frames: u64,

    /// PRNG seed for particle placement.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Edge policy (wrap, bounce). Overrides --params.
    #[arg(long)]
    edge: Option<String>,

    /// Link style preset (tight, loose). Overrides --params.
    #[arg(long)]
    links: Option<String>,

    /// Config params as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Read the whole scene from a seed JSON file instead.
    #[arg(long, conflicts_with_all = ["width", "height", "frames", "seed", "params"])]
    seed_file: Option<PathBuf>,
}

impl SceneArgs {
    fn to_seed(&self) -> Result<Seed, CliError> {
        let mut seed = match &self.seed_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                serde_json::from_str::<Seed>(&text)
                    .map_err(|e| CliError::Input(format!("invalid seed file: {e}")))?
            }
            None => {
                let params: serde_json::Value = serde_json::from_str(&self.params)
                    .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
                if !params.is_object() {
                    return Err(CliError::Input("--params must be a JSON object".into()));
                }
                Seed {
                    frames: self.frames,
                    params,
                    ..Seed::new(self.width, self.height, self.seed)
                }
            }
        };
        if let Some(obj) = seed.params.as_object_mut() {
            if let Some(edge) = &self.edge {
                obj.insert("edge_policy".into(), edge.clone().into());
            }
            if let Some(links) = &self.links {
                obj.insert("link_style".into(), links.clone().into());
            }
        }
        Ok(seed)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Simulate N frames and write the last one as a PNG.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file path.
        #[arg(short, long, default_value = "backdrop.png")]
        output: PathBuf,
    },
    /// Simulate N frames and report per-frame counters.
    Stats {
        #[command(flatten)]
        scene: SceneArgs,

        /// Also dump the last frame's draw commands (JSON mode only).
        #[arg(long)]
        commands: bool,
    },
    /// List edge policies, link styles, and config params.
    List,
}

fn summarize(stats: &[FrameStats]) -> serde_json::Value {
    let links: Vec<usize> = stats.iter().map(|s| s.links_drawn).collect();
    serde_json::json!({
        "frames": stats.len(),
        "particles": stats.first().map_or(0, |s| s.particles),
        "pairs_per_frame": stats.first().map_or(0, |s| s.pairs_checked),
        "links_min": links.iter().min().copied().unwrap_or(0),
        "links_max": links.iter().max().copied().unwrap_or(0),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let edges: Vec<&str> = EdgePolicy::ALL.iter().map(|p| p.name()).collect();
            let links = LinkStyle::PRESETS;
            if cli.json {
                let info = serde_json::json!({
                    "edge_policies": edges,
                    "link_styles": links,
                    "params": FieldConfig::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Edge policies:");
                println!("  {}", edges.join(", "));
                println!("Link styles:");
                for name in links {
                    let s = LinkStyle::from_name(name)?;
                    println!(
                        "  {name:<6} threshold {} px, opacity {} - d/{}",
                        s.threshold, s.max_opacity, s.falloff
                    );
                }
                println!("Params:");
                if let Some(schema) = FieldConfig::param_schema().as_object() {
                    for (key, entry) in schema {
                        println!("  {key:<17} {}", entry["description"].as_str().unwrap_or(""));
                    }
                }
            }
        }
        Command::Render { scene, output } => {
            let seed = scene.to_seed()?;
            let mut pixmap = Pixmap::new(0, 0);
            let (field, stats) = seed.run(&mut pixmap)?;
            snapshot::write_png(&pixmap, DEFAULT_BACKGROUND, &output)?;
            info!("wrote {} after {} frames", output.display(), stats.len());

            if cli.json {
                let info = serde_json::json!({
                    "width": seed.width,
                    "height": seed.height,
                    "seed": seed.seed,
                    "frames": stats.len(),
                    "particles": field.len(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} ({} particles, {} frames, seed {}) -> {}",
                    seed.width,
                    seed.height,
                    field.len(),
                    stats.len(),
                    seed.seed,
                    output.display()
                );
            }
        }
        Command::Stats { scene, commands } => {
            let seed = scene.to_seed()?;
            let mut surface = RecordingSurface::new(0, 0);
            let (field, stats) = seed.run(&mut surface)?;
            info!("simulated {} frames of {} particles", stats.len(), field.len());

            if cli.json {
                let mut info = serde_json::json!({
                    "seed": seed,
                    "summary": summarize(&stats),
                    "frames": stats,
                });
                if commands {
                    info["last_frame"] = serde_json::to_value(surface.commands())?;
                }
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let summary = summarize(&stats);
                println!(
                    "{} particles, {} pair checks per frame",
                    summary["particles"], summary["pairs_per_frame"]
                );
                println!(
                    "links per frame: min {}, max {} over {} frames",
                    summary["links_min"], summary["links_max"], summary["frames"]
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("backdrop").chain(args.iter().copied())).unwrap()
    }

    fn scene(cli: Cli) -> SceneArgs {
        match cli.command {
            Command::Render { scene, .. } | Command::Stats { scene, .. } => scene,
            Command::List => panic!("no scene for list"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_describe_desktop_viewport() {
        let seed = scene(parse(&["stats"])).to_seed().unwrap();
        assert_eq!((seed.width, seed.height, seed.frames, seed.seed), (1200, 800, 120, 42));
        assert_eq!(seed.config().unwrap(), FieldConfig::default());
    }

    #[test]
    fn edge_and_links_override_params() {
        let seed = scene(parse(&[
            "render",
            "--params",
            r#"{"edge_policy": "wrap", "line_width": 1.0}"#,
            "--edge",
            "bounce",
            "--links",
            "loose",
        ]))
        .to_seed()
        .unwrap();
        let config = seed.config().unwrap();
        assert_eq!(config.edge_policy, EdgePolicy::Bounce);
        assert_eq!(config.link_style.threshold, 150.0);
        assert_eq!(config.link_style.line_width, 1.0);
    }

    #[test]
    fn bad_params_json_is_input_error() {
        let err = scene(parse(&["stats", "--params", "{nope"])).to_seed().unwrap_err();
        assert_eq!(err.exit_code(), 12);
        let err = scene(parse(&["stats", "--params", "[1, 2]"])).to_seed().unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn unknown_edge_policy_is_backdrop_error() {
        let seed = scene(parse(&["stats", "--edge", "teleport"])).to_seed().unwrap();
        let err = CliError::from(seed.config().unwrap_err());
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn oversized_viewport_is_backdrop_error() {
        let seed = scene(parse(&["stats", "-W", "4294967295", "-H", "4294967295"]))
            .to_seed()
            .unwrap();
        let err = CliError::from(seed.run(&mut RecordingSurface::new(0, 0)).unwrap_err());
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn summary_reports_extremes() {
        let stats = [
            FrameStats { particles: 3, pairs_checked: 3, links_drawn: 1 },
            FrameStats { particles: 3, pairs_checked: 3, links_drawn: 3 },
        ];
        let s = summarize(&stats);
        assert_eq!(s["frames"], 2);
        assert_eq!(s["pairs_per_frame"], 3);
        assert_eq!(s["links_min"], 1);
        assert_eq!(s["links_max"], 3);
        assert_eq!(summarize(&[])["particles"], 0);
    }
}
