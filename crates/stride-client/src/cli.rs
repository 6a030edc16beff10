use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "stride", version, about = "Stride - third-person locomotion sandbox")]
pub struct CliArgs {
    /// Path to the scene YAML file
    #[arg(long, default_value = "assets/scenes/town.yaml")]
    pub scene: String,

    /// Path to the input bindings YAML file
    #[arg(long, default_value = "bindings.yaml")]
    pub bindings: String,

    /// Output mode: window or headless
    #[arg(long, default_value = "window")]
    pub output: OutputMode,

    /// Frame count for a headless run
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Fixed timestep for a headless run, in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Append flushed game events to this JSONL file
    #[arg(long)]
    pub log_events: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum OutputMode {
    Window,
    Headless,
}
