//! Cutframe CLI: build, preview, and export timeline projects.
//!
//! Usage:
//!   cutframe init <NAME>                  Create an empty project
//!   cutframe list                         List stored projects
//!   cutframe info <ID>                    Show project contents
//!   cutframe import <ID> <FILE>           Import media onto the timeline
//!   cutframe move <ID> <CLIP>             Move a clip
//!   cutframe effect <ID> <CLIP> <KIND>    Set or remove a clip effect
//!   cutframe text <ID> <TEXT>             Add a text overlay
//!   cutframe render <ID> --time <T>       Composite one frame to PNG
//!   cutframe play <ID>                    Run the playback loop
//!   cutframe drag <ID> <SCRIPT>           Replay pointer gestures
//!   cutframe export <ID>                  Export a project
//!   cutframe delete <ID>                  Delete a project

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cutframe",
    about = "Multi-track timeline editing with live preview",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project store directory (overrides the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty project
    Init {
        /// Project name
        name: String,

        /// Canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height
        #[arg(long)]
        height: Option<u32>,

        /// Frame rate
        #[arg(long)]
        fps: Option<u32>,
    },

    /// List stored projects
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show project information
    Info {
        /// Project id
        project: String,
    },

    /// Import a media file as a clip
    Import {
        /// Project id
        project: String,

        /// Media file
        file: PathBuf,

        /// Target track
        #[arg(long, default_value = "0")]
        track: usize,

        /// Start time (seconds); defaults to the end of the timeline
        #[arg(long)]
        start: Option<f64>,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,

        /// Add as a standalone audio track instead of a clip
        #[arg(long)]
        audio_track: bool,
    },

    /// Move a clip to a new start time and track
    Move {
        /// Project id
        project: String,

        /// Clip id
        clip: String,

        /// New start time (seconds)
        #[arg(long)]
        start: f64,

        /// New track
        #[arg(long)]
        track: usize,
    },

    /// Set, remove, or reset clip effects
    Effect {
        /// Project id
        project: String,

        /// Clip id
        clip: String,

        /// Effect kind: brightness|contrast|saturation|hue|blur|sepia|grayscale
        kind: Option<String>,

        /// Intensity (defaults to the kind's editor default)
        #[arg(long)]
        intensity: Option<f64>,

        /// Remove the effect instead of setting it
        #[arg(long)]
        remove: bool,

        /// Reset brightness, contrast, saturation and hue
        #[arg(long, conflicts_with_all = ["kind", "remove", "intensity"])]
        reset: bool,
    },

    /// Add a text overlay
    Text {
        /// Project id
        project: String,

        /// Overlay text
        text: String,

        /// Start time (seconds)
        #[arg(long, default_value = "0")]
        start: f64,

        /// Duration (seconds)
        #[arg(long, default_value = "3")]
        duration: f64,

        /// Left edge in canvas pixels
        #[arg(long, default_value = "100")]
        x: f64,

        /// Top edge in canvas pixels
        #[arg(long, default_value = "100")]
        y: f64,

        /// Font size in pixels
        #[arg(long, default_value = "48")]
        size: f64,

        /// Text color (hex or name)
        #[arg(long, default_value = "#ffffff")]
        color: String,

        /// Background color (hex, name, or "transparent")
        #[arg(long, default_value = "transparent")]
        background: String,

        /// Animation: none|fade-in|slide-in|zoom-in|typewriter
        #[arg(long, default_value = "none")]
        animation: String,
    },

    /// Composite one frame to a PNG file
    Render {
        /// Project id
        project: String,

        /// Timeline position (seconds)
        #[arg(short, long, default_value = "0")]
        time: f64,

        /// Output PNG path
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },

    /// Play the timeline, printing the cursor as it advances
    Play {
        /// Project id
        project: String,

        /// Start position (seconds)
        #[arg(long, default_value = "0")]
        from: f64,

        /// Tick rate override (Hz)
        #[arg(long)]
        tick_hz: Option<u32>,
    },

    /// Replay a JSONL pointer-gesture script through the timeline
    Drag {
        /// Project id
        project: String,

        /// Gesture script (one JSON pointer event per line)
        script: PathBuf,

        /// Report the result without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Export a project
    Export {
        /// Project id
        project: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Output format: mp4|webm|mov
        #[arg(long, default_value = "mp4")]
        format: String,

        /// Quality: low|medium|high
        #[arg(long, default_value = "medium")]
        quality: String,

        /// Preset: web|youtube|instagram|mobile|desktop
        #[arg(long, default_value = "web")]
        preset: String,

        /// Print the size and time estimate only
        #[arg(long)]
        estimate_only: bool,
    },

    /// Delete a project from the store
    Delete {
        /// Project id
        project: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = cutframe_common::config::AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    cutframe_common::logging::init_logging(&config.logging);
    if let Some(store) = cli.store {
        config.store_dir = store;
    }

    match cli.command {
        Commands::Init {
            name,
            width,
            height,
            fps,
        } => commands::init::run(&config, name, width, height, fps),
        Commands::List { json } => commands::list::run(&config, json),
        Commands::Info { project } => commands::info::run(&config, &project),
        Commands::Import {
            project,
            file,
            track,
            start,
            mime,
            audio_track,
        } => commands::import::run(&config, &project, file, track, start, mime, audio_track),
        Commands::Move {
            project,
            clip,
            start,
            track,
        } => commands::move_clip::run(&config, &project, clip, start, track),
        Commands::Effect {
            project,
            clip,
            kind,
            intensity,
            remove,
            reset,
        } => commands::effect::run(&config, &project, clip, kind, intensity, remove, reset),
        Commands::Text {
            project,
            text,
            start,
            duration,
            x,
            y,
            size,
            color,
            background,
            animation,
        } => commands::text::run(
            &config,
            &project,
            commands::text::TextArgs {
                text,
                start,
                duration,
                x,
                y,
                size,
                color,
                background,
                animation,
            },
        ),
        Commands::Render {
            project,
            time,
            output,
        } => commands::render::run(&config, &project, time, output).await,
        Commands::Play {
            project,
            from,
            tick_hz,
        } => commands::play::run(config, &project, from, tick_hz).await,
        Commands::Drag {
            project,
            script,
            dry_run,
        } => commands::drag::run(&config, &project, script, dry_run),
        Commands::Export {
            project,
            output,
            format,
            quality,
            preset,
            estimate_only,
        } => {
            commands::export::run(
                &config,
                &project,
                output,
                &format,
                &quality,
                &preset,
                estimate_only,
            )
            .await
        }
        Commands::Delete { project } => commands::delete::run(&config, &project),
    }
}
