use clap::Parser;
use stride_client::cli::{CliArgs, OutputMode};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    tracing::info!("Stride runtime v{}", env!("CARGO_PKG_VERSION"));

    match &args.output {
        OutputMode::Headless => {
            if let Err(e) = stride_client::harness::run_headless(args) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        OutputMode::Window => run_engine(args),
    }
}

fn run_engine(args: CliArgs) {
    let event_loop = winit::event_loop::EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut engine = stride_client::engine::Engine::new(args);

    event_loop.run_app(&mut engine).expect("Event loop error");
}
