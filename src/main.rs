mod app;
mod audio;
mod config;
mod error;
mod library;
mod player;
mod runtime;
mod scheduler;
mod ui;
mod viz;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
