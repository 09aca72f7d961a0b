use burn::lr_scheduler::LrScheduler;
use burn_cosine_decay::prelude::*;
pub use common::cli::AppArgs;

#[path = "../common/mod.rs"]
pub mod common;

pub fn launch(app_args: &AppArgs) {
    app_args.create_artifact_dir();

    // setup and save the scheduler config
    let config = app_args.load_config().unwrap_or_else(|| {
        CosineDecayConfig::new(0.1, 10)
            // decay reaches the floor, which makes the restarts easy to see
            .with_min_lr(0.0)
    });
    app_args.save_config(&config);

    let mut scheduler = app_args.load_or_init_scheduler(&config);
    println!("Resuming at iteration {}", scheduler.iteration());

    println!("{:>9} {:>6} {:>12}", "iteration", "time", "lr");
    for _ in 0..app_args.num_steps {
        let lr = scheduler.step();
        println!("{:>9} {:>6} {:>12.6e}", scheduler.iteration(), scheduler.time(), lr);
    }

    app_args.save_scheduler(&scheduler);
}

fn main() {
    env_logger::init();
    let app_args = AppArgs::parse().unwrap();
    launch(&app_args);
}
