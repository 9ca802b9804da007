// Host-side tests for the frame clock.

use tree_core::constants::MAX_FRAME_DELTA_SEC;
use tree_core::FrameClock;

#[test]
fn frame_clock_reports_bounded_non_negative_deltas() {
    let mut clock = FrameClock::new();
    let mut last_elapsed = 0.0;
    for _ in 0..5 {
        let t = clock.tick();
        assert!(t.delta >= 0.0 && t.delta <= MAX_FRAME_DELTA_SEC);
        assert!(t.elapsed >= last_elapsed);
        last_elapsed = t.elapsed;
    }
}
