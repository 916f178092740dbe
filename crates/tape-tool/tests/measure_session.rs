//! End-to-end measuring sessions against the recording host.

use approx::assert_relative_eq;
use tape_math::{Axes, Point3, Vec3};
use tape_pick::{DegreesOfFreedom, EdgeRef, RawPick};
use tape_scale::{LengthFormat, LengthUnit, Scale, SharedScale};
use tape_tool::{Host, Key, LockAnchors, Phase, RecordingHost, TapeMeasureTool, ToolConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn decimal_inches() -> ToolConfig {
    ToolConfig {
        length_format: LengthFormat::Decimal {
            unit: LengthUnit::Inches,
            precision: 0,
        },
        ..ToolConfig::default()
    }
}

fn measure(tool: &mut TapeMeasureTool, host: &mut RecordingHost, start: RawPick, end: RawPick) {
    host.place(10.0, 10.0, start);
    host.place(200.0, 10.0, end);
    tool.on_mouse_move(10.0, 10.0, host);
    tool.on_lbutton_down(host);
    tool.on_mouse_move(200.0, 10.0, host);
}

#[test]
fn test_fifty_scale_session() {
    init_logging();
    let mut host = RecordingHost::new();
    let mut tool = TapeMeasureTool::new(decimal_inches(), SharedScale::default());
    tool.activate(&mut host);

    tool.on_user_text("1:50", &mut host);
    assert_eq!(host.vcb_value(), "1:50");

    measure(
        &mut tool,
        &mut host,
        RawPick::at(Point3::origin()),
        RawPick::at(Point3::new(5.0, 0.0, 0.0)),
    );

    assert_relative_eq!(tool.length().unwrap(), 250.0, epsilon = 1e-9);
    assert_eq!(tool.readout(), "250\" (1:50)");
    assert!(host.vcb_value().ends_with("(1:50)"));

    host.begin_frame();
    tool.draw(&mut host);
    assert_eq!(host.tooltip(), "250\" (1:50)");
}

#[test]
fn test_architectural_scale_session() {
    init_logging();
    let mut host = RecordingHost::new();
    let mut tool = TapeMeasureTool::new(ToolConfig::default(), SharedScale::default());
    tool.activate(&mut host);
    tool.on_user_text("1/4\" = 1'-0\"", &mut host);

    // 3 1/8" on the model reads 12' 6" at quarter inch scale.
    measure(
        &mut tool,
        &mut host,
        RawPick::at(Point3::origin()),
        RawPick::at(Point3::new(0.0, 3.125, 0.0)),
    );
    assert_eq!(tool.readout(), "12' 6\" (1:48)");
}

#[test]
fn test_scale_outlives_the_tool() {
    init_logging();
    let scale = SharedScale::new(Scale::identity());
    let mut host = RecordingHost::new();

    let mut first = TapeMeasureTool::new(decimal_inches(), scale.clone());
    first.activate(&mut host);
    first.on_user_text("1:20", &mut host);
    first.deactivate(&mut host);

    let mut second = TapeMeasureTool::new(decimal_inches(), scale);
    second.activate(&mut host);
    assert_eq!(second.scale().to_string(), "1:20");
    assert_eq!(host.vcb_value(), "1:20");
}

#[test]
fn test_invalid_scale_keeps_previous() {
    init_logging();
    let mut host = RecordingHost::new();
    let mut tool = TapeMeasureTool::new(decimal_inches(), SharedScale::default());
    tool.activate(&mut host);
    tool.on_user_text("1:50", &mut host);

    for bad in ["0:50", "1:-2", "abc", "1:", ""] {
        tool.on_user_text(bad, &mut host);
    }
    assert_eq!(host.messages().len(), 5);
    assert_eq!(tool.scale().to_string(), "1:50");
}

#[test]
fn test_perpendicular_distance_from_edge() {
    init_logging();
    let mut host = RecordingHost::new();
    let mut tool = TapeMeasureTool::new(decimal_inches(), SharedScale::default());
    tool.activate(&mut host);

    let on_edge = RawPick {
        valid: true,
        position: Point3::origin(),
        degrees_of_freedom: DegreesOfFreedom::Line,
        edge: Some(EdgeRef {
            id: 1,
            start: Point3::new(-1.0, 0.0, 0.0),
            end: Point3::new(1.0, 0.0, 0.0),
        }),
        ..RawPick::default()
    };
    measure(&mut tool, &mut host, on_edge, RawPick::at(Point3::new(2.0, 3.0, 4.0)));

    assert_relative_eq!(tool.measure_end().unwrap(), Point3::new(0.0, 3.0, 4.0), epsilon = 1e-12);
    assert_relative_eq!(tool.measure_vector().unwrap().norm(), 5.0, epsilon = 1e-12);
    assert_eq!(tool.readout(), "5\" (1:1)");
}

#[test]
fn test_axis_lock_on_moved_axes() {
    init_logging();
    let mut host = RecordingHost::new();
    host.set_axes(Axes {
        origin: Point3::new(100.0, 100.0, 0.0),
        ..Axes::world()
    });
    let mut tool = TapeMeasureTool::new(decimal_inches(), SharedScale::default());
    tool.activate(&mut host);
    measure(
        &mut tool,
        &mut host,
        RawPick::at(Point3::new(1.0, 1.0, 1.0)),
        RawPick::at(Point3::new(4.0, 5.0, 13.0)),
    );

    tool.on_key_down(Key::Up, &mut host);
    assert_eq!(
        host.lock(),
        &LockAnchors::Line {
            start: Point3::new(1.0, 1.0, 1.0),
            end: Point3::new(1.0, 1.0, 1.0) + Vec3::z(),
        }
    );
    assert_eq!(tool.end_pick().position(), Some(Point3::new(1.0, 1.0, 13.0)));
    assert_eq!(tool.readout(), "12\" (1:1)");

    tool.on_key_down(Key::Up, &mut host);
    assert!(!host.inference_locked());
    assert_eq!(tool.readout(), "13\" (1:1)");
}

#[test]
fn test_cancel_twice_from_start() {
    init_logging();
    let mut host = RecordingHost::new();
    let mut tool = TapeMeasureTool::new(decimal_inches(), SharedScale::default());
    tool.activate(&mut host);

    tool.on_cancel(&mut host);
    let after_first = (
        tool.phase(),
        tool.start_pick().clone(),
        tool.end_pick().clone(),
        tool.inference_lock().is_engaged(),
    );
    tool.on_cancel(&mut host);
    let after_second = (
        tool.phase(),
        tool.start_pick().clone(),
        tool.end_pick().clone(),
        tool.inference_lock().is_engaged(),
    );
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.0, Phase::AwaitingStart);
}

#[test]
fn test_cancel_mid_measurement() {
    init_logging();
    let mut host = RecordingHost::new();
    let mut tool = TapeMeasureTool::new(decimal_inches(), SharedScale::default());
    tool.activate(&mut host);
    measure(
        &mut tool,
        &mut host,
        RawPick::at(Point3::origin()),
        RawPick::at(Point3::new(1.0, 0.0, 0.0)),
    );
    tool.on_key_down(Key::Shift, &mut host);
    assert!(host.inference_locked());

    tool.on_cancel(&mut host);
    assert_eq!(tool.phase(), Phase::AwaitingStart);
    assert!(!host.inference_locked());
    assert_eq!(tool.readout(), "");
}
