mod cli;
mod gui;

fn main() -> Result<(), eframe::Error> {
    let options = match cli::Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("usage: rayleigh-demo [--headless <frames>] [--windowed] [--seed <n>] [--retire-after <frames>]");
            std::process::exit(2);
        }
    };

    if let Some(frames) = options.headless_frames {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
        if let Err(e) = cli::run_headless(&options, frames) {
            log::error!("Headless run failed: {e:#}");
            std::process::exit(1);
        }
        Ok(())
    } else {
        gui::run(options)
    }
}
