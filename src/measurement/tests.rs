use std::sync::Arc;

use crate::host::{Command, InMemoryHost, SegmentationService};
use crate::model::{
    Bidirectional, BidirectionalState, CachedStats, NamedStats, Segment, Segmentation,
};
use crate::runtime::AppContext;

use super::{MeasurementError, MeasurementView, round_for_display};

fn lesion() -> Bidirectional {
    Bidirectional {
        major_extent: 12.34,
        minor_extent: 30.1,
        unit: "mm".to_string(),
        annotation_uid: "ann-1".to_string(),
    }
}

fn segmentation(named_stats: Option<NamedStats>) -> Segmentation {
    let mut segmentation = Segmentation::default();
    segmentation.segments.insert(
        1,
        Segment {
            label: "lesion".to_string(),
            cached_stats: CachedStats { named_stats },
        },
    );
    segmentation
}

fn host_with(named_stats: Option<NamedStats>) -> (Arc<InMemoryHost>, AppContext) {
    let host = InMemoryHost::shared();
    host.insert_segmentation("seg-1", segmentation(named_stats));
    let context = AppContext::with_defaults(host.services());
    (host, context)
}

/// Segmentation service that reads from the in-memory host but never stores
/// a bidirectional marker.
struct DiscardingMarks(Arc<InMemoryHost>);

impl SegmentationService for DiscardingMarks {
    fn segmentation(&self, segmentation_id: &str) -> Option<Segmentation> {
        self.0.segmentation(segmentation_id)
    }

    fn mark_bidirectional(
        &self,
        _segmentation_id: &str,
        _segment_index: u32,
        _state: BidirectionalState,
    ) -> crate::host::Result<()> {
        Ok(())
    }

    fn segmentation_updated(&self, segmentation_id: &str) {
        self.0.segmentation_updated(segmentation_id);
    }
}

fn requests(host: &InMemoryHost) -> usize {
    host.dispatched_named("runSegmentBidirectional").len()
}

#[test]
fn display_rounding_follows_magnitude() {
    assert_eq!(round_for_display(30.1), "30.1");
    assert_eq!(round_for_display(12.34), "12.3");
    assert_eq!(round_for_display(3.14159), "3.14");
    assert_eq!(round_for_display(123.6), "124");
    assert_eq!(round_for_display(0.5), "0.500");
    assert_eq!(round_for_display(f64::NAN), "NaN");
}

#[test]
fn display_rounding_breaks_ties_away_from_zero() {
    assert_eq!(round_for_display(100.5), "101");
    assert_eq!(round_for_display(12.25), "12.3");
    assert_eq!(round_for_display(2.5), "2.50");
    assert_eq!(round_for_display(-100.5), "-101");
}

#[test]
fn ready_measurement_orders_extents_by_magnitude() {
    let (_host, context) = host_with(Some(NamedStats {
        bidirectional: BidirectionalState::Ready(lesion()),
        ..NamedStats::default()
    }));
    let mut trigger = context.mount_measurement("seg-1", 1);

    let view = trigger.render().expect("render").expect("view");
    let MeasurementView::Ready(readout) = view else {
        panic!("expected a readout, got {view:?}");
    };
    assert_eq!(readout.length, "30.1 mm");
    assert_eq!(readout.width, "12.3 mm");
    assert!(readout.visible);
    assert!(!trigger.has_requested());
}

#[test]
fn segment_without_named_stats_renders_nothing_and_requests_nothing() {
    let (host, context) = host_with(None);
    let mut trigger = context.mount_measurement("seg-1", 1);
    for _ in 0..3 {
        assert!(trigger.render().expect("render").is_none());
    }
    assert_eq!(requests(&host), 0);
}

#[test]
fn absent_measurement_is_requested_once_per_mount() {
    let (host, context) = host_with(Some(NamedStats::default()));
    let mut trigger = context.mount_measurement("seg-1", 1);

    for _ in 0..5 {
        let view = trigger.render().expect("render").expect("view");
        assert!(matches!(view, MeasurementView::Pending { .. }));
    }
    assert_eq!(requests(&host), 1);
    assert_eq!(
        host.dispatched_named("runSegmentBidirectional"),
        vec![Command::ComputeBidirectional {
            segmentation_id: "seg-1".to_string(),
            segment_index: 1,
        }]
    );
}

#[test]
fn request_flag_holds_when_the_service_drops_the_pending_marker() {
    let host = InMemoryHost::shared();
    host.insert_segmentation("seg-1", segmentation(Some(NamedStats::default())));
    let mut services = host.services();
    services.segmentation = Arc::new(DiscardingMarks(Arc::clone(&host)));
    let context = AppContext::with_defaults(services);
    let mut trigger = context.mount_measurement("seg-1", 1);

    for _ in 0..4 {
        let view = trigger.render().expect("render").expect("view");
        assert!(matches!(view, MeasurementView::Pending { .. }));
    }
    assert!(trigger.has_requested());
    assert_eq!(requests(&host), 1);
}

#[test]
fn remount_sees_pending_marker_and_does_not_request_again() {
    let (host, context) = host_with(Some(NamedStats::default()));
    {
        let mut first = context.mount_measurement("seg-1", 1);
        first.render().expect("render");
    }
    let mut second = context.mount_measurement("seg-1", 1);
    second.render().expect("render");
    assert_eq!(requests(&host), 1);
    assert!(!second.has_requested());
}

#[test]
fn synchronous_answer_is_shown_on_the_requesting_render() {
    let (host, context) = host_with(Some(NamedStats::default()));
    host.answer_bidirectional("seg-1", 1, lesion());
    let mut trigger = context.mount_measurement("seg-1", 1);

    let view = trigger.render().expect("render").expect("view");
    assert!(matches!(view, MeasurementView::Ready(ref readout) if readout.length == "30.1 mm"));
    trigger.render().expect("render");
    assert_eq!(requests(&host), 1);
}

#[test]
fn failed_request_is_recorded_in_the_cache() {
    let (host, context) = host_with(Some(NamedStats::default()));
    host.fail_command("runSegmentBidirectional");
    let mut trigger = context.mount_measurement("seg-1", 1);

    let view = trigger.render().expect("render").expect("view");
    let MeasurementView::Failed { notice, reason } = view else {
        panic!("expected a failure notice, got {view:?}");
    };
    assert_eq!(notice, "Can't compute bidirectional measurement");
    assert!(reason.contains("rejected by host"));

    let mut remounted = context.mount_measurement("seg-1", 1);
    assert!(matches!(
        remounted.render().expect("render"),
        Some(MeasurementView::Failed { .. })
    ));
    assert_eq!(requests(&host), 1);
}

#[test]
fn unknown_segment_is_an_error() {
    let (_host, context) = host_with(None);
    let mut missing_segmentation = context.mount_measurement("seg-9", 1);
    assert!(matches!(
        missing_segmentation.render(),
        Err(MeasurementError::UnknownSegmentation(_))
    ));
    let mut missing_segment = context.mount_measurement("seg-1", 7);
    assert!(matches!(
        missing_segment.render(),
        Err(MeasurementError::UnknownSegment { segment_index: 7, .. })
    ));
}

#[test]
fn showing_a_hidden_annotation_jumps_to_it() {
    let (host, context) = host_with(Some(NamedStats {
        bidirectional: BidirectionalState::Ready(lesion()),
        ..NamedStats::default()
    }));
    let trigger = context.mount_measurement("seg-1", 1);

    assert!(!trigger.toggle_visibility().expect("hide"));
    assert!(host.dispatched_named("jumpToMeasurement").is_empty());

    assert!(trigger.toggle_visibility().expect("show"));
    assert_eq!(
        host.dispatched_named("jumpToMeasurement"),
        vec![Command::JumpToAnnotation {
            uid: "ann-1".to_string(),
        }]
    );
    assert_eq!(
        host.updated_segmentations(),
        vec!["seg-1".to_string(), "seg-1".to_string()]
    );
}

#[test]
fn failed_jump_keeps_the_visibility_toggle() {
    let (host, context) = host_with(Some(NamedStats {
        bidirectional: BidirectionalState::Ready(lesion()),
        ..NamedStats::default()
    }));
    host.fail_command("jumpToMeasurement");
    let trigger = context.mount_measurement("seg-1", 1);

    assert!(!trigger.toggle_visibility().expect("hide"));
    assert!(trigger.toggle_visibility().expect("show"));
    assert_eq!(host.dispatched_named("jumpToMeasurement").len(), 1);
    assert_eq!(
        host.updated_segmentations(),
        vec!["seg-1".to_string(), "seg-1".to_string()]
    );
    let MeasurementView::Ready(readout) = context
        .mount_measurement("seg-1", 1)
        .render()
        .expect("render")
        .expect("view")
    else {
        panic!("expected a readout");
    };
    assert!(readout.visible);
}

#[test]
fn visibility_toggle_needs_a_ready_measurement() {
    let (_host, context) = host_with(Some(NamedStats::default()));
    let trigger = context.mount_measurement("seg-1", 1);
    assert!(matches!(
        trigger.toggle_visibility(),
        Err(MeasurementError::NotReady { .. })
    ));
}
