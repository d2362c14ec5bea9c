//! Spin Wheel entry point
//!
//! The browser build is driven through `WheelWidget`; natively this runs a
//! seeded demo spin against a manually pumped clock and prints the outcome.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use spin_wheel::platform::ManualClock;
    use spin_wheel::wheel::{SeededRandom, SpinEngine};
    use spin_wheel::{SpinOptions, Wedge};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(12345);
    log::info!("Spin Wheel (native) starting with seed: {}", seed);

    let wedges = vec![
        Wedge::prize("grand", 5.0).with_order(0).with_label("Grand Prize"),
        Wedge::filler("try-again-1").with_order(1).with_label("Try Again"),
        Wedge::prize("coupon", 25.0).with_order(2).with_label("10% Coupon"),
        Wedge::filler("try-again-2").with_order(3).with_label("Try Again"),
        Wedge::prize("free-item", 10.0).with_order(4).with_label("Free Item"),
        Wedge::filler("try-again-3").with_order(5).with_label("Try Again"),
    ];

    let clock = ManualClock::new();
    let mut engine = SpinEngine::new(clock.clone(), SeededRandom::new(seed));
    if let Err(e) = engine.configure(wedges) {
        log::error!("Failed to configure wheel: {}", e);
        return;
    }

    println!("Selection odds:");
    for (id, p) in engine.weights().probabilities() {
        println!("  {:<12} {:>6.2}%", id, p * 100.0);
    }

    if let Err(e) = engine.spin(SpinOptions::default()) {
        log::error!("Spin rejected: {}", e);
        return;
    }

    // Pump frames at 60 Hz until the engine stops asking
    let mut frames = 0u32;
    while clock.take_frame() {
        clock.advance(1000.0 / 60.0);
        engine.on_animation_frame();
        frames += 1;
    }

    match engine.last_result() {
        Some(result) => println!(
            "\nLanded on {} ({}) at {:.2}° after {} frames",
            result.wedge.id, result.wedge.label, result.final_angle, frames
        ),
        None => println!("\nSpin did not complete"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
