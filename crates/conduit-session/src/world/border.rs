//! World-border replication.
//!
//! The backend streams border changes; the target protocol has no native
//! border, so the session redraws it client-side from this state. The
//! update step is pure given a time instant: redundant calls with
//! unchanged inputs produce no new output.

use std::time::Instant;

/// Client-visible border snapshot produced by an update step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderChange {
    pub diameter: f64,
    pub center_x: f64,
    pub center_z: f64,
    pub resizing: bool,
}

#[derive(Debug)]
pub struct WorldBorder {
    pub old_diameter: f64,
    pub new_diameter: f64,
    /// Transition duration in milliseconds.
    pub speed: i64,
    pub resizing: bool,
    pub center_x: f64,
    pub center_z: f64,
    resize_started: Option<Instant>,
    last_emitted: Option<BorderChange>,
}

/// Default border diameter before the backend says otherwise.
const DEFAULT_DIAMETER: f64 = 60_000_000.0;

impl Default for WorldBorder {
    fn default() -> Self {
        Self {
            old_diameter: DEFAULT_DIAMETER,
            new_diameter: DEFAULT_DIAMETER,
            speed: 0,
            resizing: false,
            center_x: 0.0,
            center_z: 0.0,
            resize_started: None,
            last_emitted: None,
        }
    }
}

impl WorldBorder {
    /// Begin an interpolated resize.
    pub fn set_lerp(&mut self, old_diameter: f64, new_diameter: f64, speed: i64, now: Instant) {
        self.old_diameter = old_diameter;
        self.new_diameter = new_diameter;
        self.speed = speed;
        self.resizing = true;
        self.resize_started = Some(now);
    }

    /// Jump straight to a new diameter.
    pub fn set_size(&mut self, diameter: f64) {
        self.old_diameter = diameter;
        self.new_diameter = diameter;
        self.speed = 0;
        self.resizing = false;
        self.resize_started = None;
    }

    pub fn set_center(&mut self, x: f64, z: f64) {
        self.center_x = x;
        self.center_z = z;
    }

    /// Diameter the client should see at `now`.
    pub fn current_diameter(&self, now: Instant) -> f64 {
        if !self.resizing {
            return self.new_diameter;
        }
        let Some(started) = self.resize_started else {
            return self.old_diameter;
        };
        if self.speed <= 0 {
            return self.new_diameter;
        }
        let elapsed_ms = now.saturating_duration_since(started).as_millis() as f64;
        let progress = (elapsed_ms / self.speed as f64).clamp(0.0, 1.0);
        self.old_diameter + (self.new_diameter - self.old_diameter) * progress
    }

    /// Recompute the visible border. Returns `None` when nothing the
    /// client can see has changed since the last emission.
    pub fn update(&mut self, now: Instant) -> Option<BorderChange> {
        let diameter = self.current_diameter(now);
        if self.resizing && diameter == self.new_diameter {
            self.resizing = false;
            self.resize_started = None;
        }
        let change = BorderChange {
            diameter,
            center_x: self.center_x,
            center_z: self.center_z,
            resizing: self.resizing,
        };
        if self.last_emitted == Some(change) {
            return None;
        }
        self.last_emitted = Some(change);
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn instant_resize_is_visible_once() {
        let mut border = WorldBorder::default();
        let now = Instant::now();
        border.set_size(128.0);
        let change = border.update(now).expect("first update must emit");
        assert_eq!(change.diameter, 128.0);
        assert!(!change.resizing);
        // Redundant recompute with unchanged inputs: no new output.
        assert!(border.update(now).is_none());
        assert!(border.update(now + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn lerp_interpolates_over_duration() {
        let mut border = WorldBorder::default();
        let start = Instant::now();
        border.set_lerp(100.0, 50.0, 10_000, start);
        assert_eq!(border.current_diameter(start), 100.0);
        let halfway = border.current_diameter(start + Duration::from_millis(5_000));
        assert_eq!(halfway, 75.0);
        let done = border.current_diameter(start + Duration::from_millis(10_000));
        assert_eq!(done, 50.0);
        // Past the end the diameter stays pinned.
        let after = border.current_diameter(start + Duration::from_millis(20_000));
        assert_eq!(after, 50.0);
    }

    #[test]
    fn update_clears_resizing_at_target() {
        let mut border = WorldBorder::default();
        let start = Instant::now();
        border.set_lerp(100.0, 50.0, 1_000, start);
        let mid = border.update(start + Duration::from_millis(500)).unwrap();
        assert!(mid.resizing);
        let end = border.update(start + Duration::from_millis(1_000)).unwrap();
        assert!(!end.resizing);
        assert_eq!(end.diameter, 50.0);
        assert!(!border.resizing);
    }

    #[test]
    fn center_change_triggers_emission() {
        let mut border = WorldBorder::default();
        let now = Instant::now();
        border.update(now);
        assert!(border.update(now).is_none());
        border.set_center(100.0, -100.0);
        let change = border.update(now).unwrap();
        assert_eq!(change.center_x, 100.0);
        assert_eq!(change.center_z, -100.0);
    }

    #[test]
    fn zero_speed_lerp_lands_immediately() {
        let mut border = WorldBorder::default();
        let now = Instant::now();
        border.set_lerp(100.0, 50.0, 0, now);
        assert_eq!(border.current_diameter(now), 50.0);
    }
}
