//! Rotary encoder decoding.
//!
//! One detent is one falling edge on CLK. The level of DT at that edge gives
//! the direction: high is clockwise (positive), low counter-clockwise.

/// Raw encoder pin levels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderPins {
    pub clk: bool,
    pub dt: bool,
}

/// Direction of one encoder detent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderDirection {
    Clockwise,
    CounterClockwise,
}

impl EncoderDirection {
    /// `1.0` or `-1.0`.
    #[inline]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// Falling-edge detector with a minimum tick spacing.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncoderDecoder {
    last_clk: Option<bool>,
    last_tick: Option<u64>,
}

impl EncoderDecoder {
    pub const fn new() -> Self {
        Self {
            last_clk: None,
            last_tick: None,
        }
    }

    /// Re-sample CLK without producing a tick.
    pub fn resync(
        &mut self,
        clk: bool,
    ) {
        self.last_clk = Some(clk);
    }

    /// Feed one sample.
    ///
    /// Returns a direction on a CLK falling edge, unless the previous tick was
    /// less than `min_interval_ms` ago. Edges inside the interval are consumed.
    pub fn poll(
        &mut self,
        pins: EncoderPins,
        now_ms: u64,
        min_interval_ms: u64,
    ) -> Option<EncoderDirection> {
        let previous = self.last_clk.replace(pins.clk);
        if previous != Some(true) || pins.clk {
            return None;
        }

        if let Some(last) = self.last_tick
            && now_ms.saturating_sub(last) < min_interval_ms
        {
            return None;
        }
        self.last_tick = Some(now_ms);

        Some(if pins.dt { EncoderDirection::Clockwise } else { EncoderDirection::CounterClockwise })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH: EncoderPins = EncoderPins { clk: true, dt: true };

    fn fall(dt: bool) -> EncoderPins { EncoderPins { clk: false, dt } }

    #[test]
    fn test_falling_edge_direction() {
        let mut enc = EncoderDecoder::new();
        assert_eq!(enc.poll(HIGH, 0, 50), None);
        assert_eq!(enc.poll(fall(true), 10, 50), Some(EncoderDirection::Clockwise));
        assert_eq!(enc.poll(fall(true), 20, 50), None);

        assert_eq!(enc.poll(HIGH, 70, 50), None);
        assert_eq!(enc.poll(fall(false), 80, 50), Some(EncoderDirection::CounterClockwise));
    }

    #[test]
    fn test_first_sample_low_is_not_an_edge() {
        let mut enc = EncoderDecoder::new();
        assert_eq!(enc.poll(fall(true), 0, 50), None);
    }

    #[test]
    fn test_min_interval() {
        let mut enc = EncoderDecoder::new();
        enc.poll(HIGH, 0, 300);
        assert!(enc.poll(fall(true), 10, 300).is_some());
        enc.poll(HIGH, 20, 300);
        assert!(enc.poll(fall(true), 100, 300).is_none());
        enc.poll(HIGH, 200, 300);
        assert!(enc.poll(fall(true), 310, 300).is_some());
    }

    #[test]
    fn test_resync_suppresses_stale_edge() {
        let mut enc = EncoderDecoder::new();
        enc.poll(HIGH, 0, 50);
        // CLK went low while the decoder was not being polled.
        enc.resync(false);
        assert_eq!(enc.poll(fall(true), 500, 50), None);
    }

    #[test]
    fn test_sign() {
        assert_eq!(EncoderDirection::Clockwise.sign(), 1.0);
        assert_eq!(EncoderDirection::CounterClockwise.sign(), -1.0);
    }
}
