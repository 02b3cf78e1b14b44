use serde::Serialize;

/// A bounded integer control. Any requested value is clamped into `[min, max]`
/// and snapped to the nearest step above `min`, so the held value is always valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slider {
    pub label: &'static str,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    value: u32,
}

impl Slider {
    pub fn new(label: &'static str, min: u32, max: u32, step: u32, value: u32) -> Self {
        let mut slider = Self {
            label,
            min,
            max: max.max(min),
            step: step.max(1),
            value: min,
        };
        slider.set(i64::from(value));
        slider
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Returns the value actually held after clamping.
    pub fn set(&mut self, requested: i64) -> u32 {
        let min = i64::from(self.min);
        let max = i64::from(self.max);
        let step = i64::from(self.step);

        let clamped = requested.clamp(min, max);
        let offset = clamped - min;
        // Round half up onto the step grid, then make sure rounding didn't overshoot
        let snapped = min + ((offset + step / 2) / step) * step;
        let snapped = if snapped > max { snapped - step } else { snapped };

        self.value = u32::try_from(snapped.max(min)).unwrap_or(self.min);
        self.value
    }

    /// Tick marks every `every` units from `min` up to `max`, for renderers.
    pub fn marks(&self, every: u32) -> Vec<u32> {
        let every = every.max(1);
        let first = self.min.div_ceil(every) * every;
        (first..=self.max).step_by(every as usize).collect()
    }
}

/// Multi-line text buffered locally, one entry per line. Nothing is committed
/// until the owning panel saves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_length_cannot_leave_range() {
        let mut queue = Slider::new("Max queue length", 1, 5, 1, 5);
        assert_eq!(queue.set(0), 1);
        assert_eq!(queue.set(-40), 1);
        assert_eq!(queue.set(9), 5);
        assert_eq!(queue.set(3), 3);
    }

    #[test]
    fn test_snaps_to_step() {
        let mut ping = Slider::new("Maximum ping (ms)", 10, 2000, 10, 500);
        assert_eq!(ping.set(504), 500);
        assert_eq!(ping.set(505), 510);
        assert_eq!(ping.set(1999), 2000);

        let mut idle = Slider::new("Idle autokick (minutes)", 0, 100, 5, 5);
        assert_eq!(idle.set(12), 10);
        assert_eq!(idle.set(13), 15);
    }

    #[test]
    fn test_snap_never_overshoots_max() {
        let mut odd = Slider::new("odd", 0, 7, 5, 0);
        assert_eq!(odd.set(7), 5);
    }

    #[test]
    fn test_initial_value_is_clamped() {
        assert_eq!(Slider::new("x", 1, 5, 1, 50).value(), 5);
    }

    #[test]
    fn test_marks() {
        let cooldown = Slider::new("Teamswitch cooldown (minutes)", 0, 100, 1, 15);
        assert_eq!(cooldown.marks(20), vec![0, 20, 40, 60, 80, 100]);
        let ping = Slider::new("Maximum ping (ms)", 10, 2000, 10, 500);
        assert_eq!(ping.marks(500), vec![500, 1000, 1500, 2000]);
    }

    #[test]
    fn test_line_buffer_round_trips_text() {
        let mut buffer = LineBuffer::default();
        buffer.set_text("60 Welcome to {servername}\r\n120 Next map is {nextmap}");
        assert_eq!(
            buffer.text(),
            "60 Welcome to {servername}\n120 Next map is {nextmap}"
        );
        assert_eq!(
            buffer.into_lines(),
            ["60 Welcome to {servername}", "120 Next map is {nextmap}"]
        );
    }
}
