use super::config::VerticalConfig;

/// Height of the flat ground plane the character stands on.
pub const GROUND_HEIGHT: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalState {
    pub vertical_velocity: f32,
    pub grounded: bool,
}

impl Default for VerticalState {
    fn default() -> Self {
        Self {
            vertical_velocity: 0.0,
            grounded: true,
        }
    }
}

/// Outcome of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalStep {
    pub state: VerticalState,
    pub y: f32,
    pub delta_y: f32,
    /// A jump impulse was applied this step.
    pub jumped: bool,
    /// The character was airborne and touched the ground this step.
    pub landed: bool,
}

/// Semi-implicit Euler jump/gravity model over a flat ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalMotionModel {
    pub jump_impulse: f32,
    pub gravity: f32,
}

impl Default for VerticalMotionModel {
    fn default() -> Self {
        Self::new(&VerticalConfig::default())
    }
}

impl VerticalMotionModel {
    pub fn new(config: &VerticalConfig) -> Self {
        Self {
            jump_impulse: config.jump_impulse,
            gravity: config.gravity,
        }
    }

    pub fn integrate(
        &self,
        state: VerticalState,
        y: f32,
        dt: f32,
        jump_requested: bool,
    ) -> VerticalStep {
        let mut next = state;
        let mut jumped = false;

        if jump_requested && next.grounded {
            next.vertical_velocity = self.jump_impulse;
            next.grounded = false;
            jumped = true;
        }

        next.vertical_velocity -= self.gravity * dt;
        let mut next_y = y + next.vertical_velocity * dt;

        let airborne = !next.grounded;
        let mut landed = false;
        if next_y <= GROUND_HEIGHT {
            next_y = GROUND_HEIGHT;
            next.vertical_velocity = 0.0;
            next.grounded = true;
            landed = airborne;
        }

        VerticalStep {
            state: next,
            y: next_y,
            delta_y: next_y - y,
            jumped,
            landed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn jump_applies_impulse_then_one_gravity_step() {
        let model = VerticalMotionModel::default();
        let step = model.integrate(VerticalState::default(), 0.0, DT, true);

        assert!(step.jumped);
        assert!(!step.state.grounded);
        assert!((step.state.vertical_velocity - (5.0 - 9.8 * DT)).abs() < 1e-6);
        assert!(step.y > 0.0);
        assert_eq!(step.delta_y, step.y);
    }

    #[test]
    fn jump_is_ignored_while_airborne() {
        let model = VerticalMotionModel::default();
        let airborne = VerticalState {
            vertical_velocity: 1.0,
            grounded: false,
        };
        let step = model.integrate(airborne, 2.0, DT, true);

        assert!(!step.jumped);
        assert!((step.state.vertical_velocity - (1.0 - 9.8 * DT)).abs() < 1e-6);
    }

    #[test]
    fn resting_character_stays_clamped_without_landing() {
        let model = VerticalMotionModel::default();
        let step = model.integrate(VerticalState::default(), 0.0, DT, false);

        assert_eq!(step.y, 0.0);
        assert_eq!(step.delta_y, 0.0);
        assert_eq!(step.state, VerticalState::default());
        assert!(!step.landed);
    }

    #[test]
    fn landing_clamps_exactly_on_first_crossing_tick() {
        let model = VerticalMotionModel::default();
        let mut state = VerticalState::default();
        let mut y = 0.0;

        let first = model.integrate(state, y, DT, true);
        state = first.state;
        y = first.y;

        let mut ticks = 1;
        loop {
            let raw_y = y + (state.vertical_velocity - model.gravity * DT) * DT;
            let step = model.integrate(state, y, DT, false);
            ticks += 1;

            if raw_y <= 0.0 {
                assert_eq!(step.y, 0.0);
                assert_eq!(step.state.vertical_velocity, 0.0);
                assert!(step.state.grounded);
                assert!(step.landed);
                break;
            }

            assert!(!step.state.grounded, "grounded early at tick {ticks}");
            assert!(!step.landed);
            state = step.state;
            y = step.y;
            assert!(ticks < 1_000, "never landed");
        }
    }

    #[test]
    fn oversized_step_from_airborne_lands_on_the_plane() {
        let model = VerticalMotionModel::default();
        let falling = VerticalState {
            vertical_velocity: -3.0,
            grounded: false,
        };
        let step = model.integrate(falling, 0.5, 1.0, false);

        assert_eq!(step.y, 0.0);
        assert_eq!(step.delta_y, -0.5);
        assert!(step.landed);
    }
}
