/// Distance in scale units a single leg covers before it settles.
const LEG_LENGTH: f64 = 1.0;

/// The direction a scale is currently travelling in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Direction {
    #[default]
    Idle,
    Forward,
    Backward,
}

impl Direction {
    /// The signed unit this direction moves the scale by.
    pub(crate) fn sign(self) -> f64 {
        match self {
            Self::Idle => 0.0,
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    /// The direction that travels away from a settled extreme.
    fn away_from(settled: f64) -> Self {
        // 1 - 2 * settled: +1 when resting at 0, -1 when resting at 1.
        if 1.0 - 2.0 * settled > 0.0 { Self::Forward } else { Self::Backward }
    }
}

/// A single animated scalar that travels between 0 and 1, one leg at a time.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ScaleState {
    scale: f64,
    direction: Direction,
    target_scale: f64,
    step: f64,
}

impl ScaleState {
    pub(crate) fn new(step: f64) -> Self {
        Self { scale: 0.0, direction: Direction::Idle, target_scale: 0.0, step }
    }

    pub(crate) fn scale(&self) -> f64 {
        self.scale
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    /// The extreme this scale last settled at.
    pub(crate) fn target_scale(&self) -> f64 {
        self.target_scale
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.direction != Direction::Idle
    }

    /// Move the scale by one step.
    ///
    /// Returns `true` exactly when this step completed the current leg. Once the scale has moved
    /// further than a full leg away from where it last settled it snaps onto the opposite extreme
    /// and the state goes idle. Calling this while idle does nothing.
    pub(crate) fn advance(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        let sign = self.direction.sign();
        self.scale += self.step * sign;
        if (self.scale - self.target_scale).abs() > LEG_LENGTH {
            self.scale = self.target_scale + sign;
            self.direction = Direction::Idle;
            self.target_scale = self.scale;
            return true;
        }
        false
    }

    /// Start a leg away from the current extreme.
    ///
    /// Returns `false` without touching anything if a leg is already running.
    pub(crate) fn begin(&mut self) -> bool {
        if self.is_animating() {
            return false;
        }
        self.direction = Direction::away_from(self.target_scale);
        true
    }

    /// Abandon a leg that has not moved yet, leaving the scale idle at its extreme.
    pub(crate) fn cancel(&mut self) {
        if self.scale == self.target_scale {
            self.direction = Direction::Idle;
        }
    }
}
