use canvas_kit::{
    fill_auto_wrap_text, fill_round_rect, stroke_auto_wrap_text, stroke_round_rect, text_wrap,
    Color, ColorApplicationMode, DrawCall, DrawingSurface, RecordingSurface, Rect, TextMetrics,
    WrapOptions,
};

/// Surface that only counts what happens to it, relying on the trait's
/// default method-style setters
#[derive(Default)]
struct CountingSurface {
    fills: usize,
    assigned: Vec<Color>,
    depth: i32,
    max_depth: i32,
}

impl DrawingSurface for CountingSurface {
    fn begin_path(&mut self) {}
    fn arc(&mut self, _: f32, _: f32, _: f32, _: f32, _: f32) {}
    fn line_to(&mut self, _: f32, _: f32) {}
    fn close_path(&mut self) {}
    fn clip(&mut self) {}
    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }
    fn restore(&mut self) {
        self.depth -= 1;
    }
    fn fill(&mut self) {
        self.fills += 1;
    }
    fn stroke(&mut self) {}
    fn color_mode(&self) -> ColorApplicationMode {
        ColorApplicationMode::MethodStyle
    }
    fn assign_fill_style(&mut self, color: Color) {
        self.assigned.push(color);
    }
    fn assign_stroke_style(&mut self, color: Color) {
        self.assigned.push(color);
    }
    fn set_font(&mut self, _: &str) {}
    fn measure_text(&mut self, text: &str) -> TextMetrics {
        TextMetrics {
            width: text.len() as f32,
        }
    }
    fn fill_text(&mut self, _: &str, _: f32, _: f32, _: f32) {}
    fn stroke_text(&mut self, _: &str, _: f32, _: f32, _: f32) {}
}

#[test]
fn oversized_radius_never_draws() {
    let cases = [
        (10.0, 100.0, 5.5),
        (100.0, 10.0, 5.5),
        (0.0, 0.0, 0.5),
        (30.0, 30.0, 15.01),
    ];
    for (w, h, r) in cases {
        let mut surface = RecordingSurface::new();
        let rect = Rect::new(3.0, 4.0, w, h);
        assert!(!fill_round_rect(&mut surface, rect, r, Color::WHITE));
        assert!(!stroke_round_rect(&mut surface, rect, r, Color::WHITE));
        assert!(surface.calls().is_empty(), "{w}x{h} r={r}");
    }
}

#[test]
fn default_setter_forwards_to_property() {
    let mut surface = CountingSurface::default();
    assert!(fill_round_rect(
        &mut surface,
        Rect::new(0.0, 0.0, 50.0, 50.0),
        10.0,
        Color::BLACK
    ));
    assert_eq!(surface.assigned, vec![Color::BLACK]);
    assert_eq!(surface.fills, 1);
    assert_eq!(surface.depth, 0);
    assert_eq!(surface.max_depth, 1);
}

#[test]
fn wrap_starts_at_zero_and_ends_at_length() {
    let texts = [
        "a",
        "hello world",
        "line one\nline two\r\nline three",
        "\n\n\n",
        "ünïcödé text wraps by character",
    ];
    for text in texts {
        for limit in [0.0, 15.0, 40.0, 1000.0] {
            let mut surface = RecordingSurface::new().with_char_advance(7.0);
            let breaks = text_wrap(&mut surface, limit, text, "14px mono");
            assert_eq!(breaks.first(), Some(&0));
            assert_eq!(breaks.last(), Some(&text.chars().count()));
        }
    }
}

#[test]
fn wrap_is_non_decreasing_without_newlines() {
    for limit in [0.0, 9.0, 21.0, 50.0] {
        let mut surface = RecordingSurface::new().with_char_advance(10.0);
        let breaks = text_wrap(&mut surface, limit, "the quick brown fox", "10px a");
        assert!(breaks.windows(2).all(|w| w[0] <= w[1]), "{breaks:?}");
    }
}

#[test]
fn newline_break_follows_newline() {
    let mut surface = RecordingSurface::new().with_char_advance(1.0);
    let breaks = text_wrap(&mut surface, 100.0, "ab\ncd", "10px a");
    assert!(breaks.contains(&3));
}

#[test]
fn unlimited_wrap_draws_one_segment_per_pair() {
    let text = "pack my box with five dozen liquor jugs";
    let mut measurer = RecordingSurface::new().with_char_advance(8.0);
    let breaks = text_wrap(&mut measurer, 60.0, text, "16px serif");

    let mut surface = RecordingSurface::new().with_char_advance(8.0);
    let options = WrapOptions::default().with_font("16px serif").with_line_height(18.0);
    let info = fill_auto_wrap_text(&mut surface, text, 10.0, 20.0, 60.0, &options);

    assert_eq!(info.rows, breaks.len() - 1);
    assert_eq!(surface.drawn_text().len(), breaks.len() - 1);
    assert_eq!(surface.drawn_text().concat(), text);
    assert_eq!(info.y, 20.0 + 18.0 * info.rows as f32);
    assert_eq!(info.x, 10.0);
}

#[test]
fn limited_wrap_draws_exactly_limit_segments() {
    let text = "pack my box with five dozen liquor jugs";
    for lines in 1..=3 {
        let mut surface = RecordingSurface::new().with_char_advance(8.0);
        let options = WrapOptions::default().with_lines(lines);
        let info = stroke_auto_wrap_text(&mut surface, text, 0.0, 0.0, 60.0, &options);

        let drawn = surface.drawn_text();
        assert_eq!(drawn.len(), lines);
        assert_eq!(info.rows, lines);
        assert!(drawn.last().unwrap().ends_with("..."), "{drawn:?}");
        assert!(surface
            .calls()
            .iter()
            .any(|c| matches!(c, DrawCall::StrokeText { .. })));
    }
}

#[test]
fn arrow_circle_sweep_matches_angle() {
    use canvas_kit::{fill_arrow_circle, ArrowCircle};
    use std::f32::consts::PI;

    for angle in [0.0, 0.1, 0.3, 0.5] {
        let mut surface = RecordingSurface::new();
        fill_arrow_circle(
            &mut surface,
            &ArrowCircle::new(1.0, 2.0, 33.0).with_angle(angle),
            Color::WHITE,
        );
        let sweep = surface
            .calls()
            .iter()
            .find_map(|c| match c {
                DrawCall::Arc {
                    start_angle,
                    end_angle,
                    ..
                } => Some(end_angle - start_angle),
                _ => None,
            })
            .unwrap();
        assert!((sweep - (2.0 - 2.0 * angle) * PI).abs() < 1e-5);
    }
}
