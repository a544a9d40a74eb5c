use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use terrella::{
    ConstructionError, ConstructorOptions, Event, Exporter, FeatureConstructor, Geography, GeometryType,
    TerrellaError,
};

fn coords(values: &[f64]) -> Event {
    Event::Coords {
        coords: values.to_vec(),
        dims: 2,
    }
}

fn polygon(rings: &[&[f64]]) -> Vec<Event> {
    let mut events = vec![Event::GeomStart(GeometryType::Polygon, rings.len())];
    for ring in rings {
        events.extend([Event::RingStart(ring.len() / 2), coords(ring), Event::RingEnd]);
    }
    events.push(Event::GeomEnd);
    events
}

fn construct(events: &[Event]) -> Geography {
    FeatureConstructor::new(ConstructorOptions::default())
        .construct(events)
        .expect("valid geometry")
}

/// Compares the nesting of two event streams exactly and their coordinates within a tolerance.
fn assert_events_eq(actual: &[Event], expected: &[Event]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} != {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        match (a, e) {
            (
                Event::Coords { coords: a, dims: ad },
                Event::Coords { coords: e, dims: ed },
            ) => {
                assert_eq!(ad, ed);
                assert_eq!(a.len(), e.len());
                for (a, e) in a.iter().zip(e) {
                    assert_abs_diff_eq!(*a, *e, epsilon = 1e-9);
                }
            }
            _ => assert_eq!(a, e),
        }
    }
}

const SQUARE: &[f64] = &[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, 0.0, 0.0];

#[test]
fn round_trip() {
    let cases = vec![
        vec![
            Event::GeomStart(GeometryType::Point, 1),
            coords(&[30.0, 10.0]),
            Event::GeomEnd,
        ],
        vec![
            Event::GeomStart(GeometryType::MultiPoint, 2),
            coords(&[30.0, 10.0, -40.0, 20.0]),
            Event::GeomEnd,
        ],
        vec![
            Event::GeomStart(GeometryType::LineString, 3),
            coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0]),
            Event::GeomEnd,
        ],
        vec![
            Event::GeomStart(GeometryType::MultiLineString, 2),
            Event::GeomStart(GeometryType::LineString, 2),
            coords(&[0.0, 0.0, 10.0, 0.0]),
            Event::GeomEnd,
            Event::GeomStart(GeometryType::LineString, 2),
            coords(&[20.0, 20.0, 30.0, 30.0]),
            Event::GeomEnd,
            Event::GeomEnd,
        ],
        polygon(&[SQUARE]),
        [
            vec![Event::GeomStart(GeometryType::GeometryCollection, 2)],
            vec![
                Event::GeomStart(GeometryType::Point, 1),
                coords(&[1.0, 2.0]),
                Event::GeomEnd,
            ],
            polygon(&[SQUARE]),
            vec![Event::GeomEnd],
        ]
        .concat(),
    ];

    let exporter = Exporter::new();
    for events in cases {
        let geography = construct(&events);
        assert_events_eq(&exporter.to_events(&geography), &events);
    }
}

#[test]
fn idempotence() {
    let hole: &[f64] = &[2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0, 2.0, 2.0, 2.0];
    let events = [
        vec![Event::GeomStart(GeometryType::GeometryCollection, 2)],
        polygon(&[SQUARE, hole]),
        vec![
            Event::GeomStart(GeometryType::LineString, 2),
            coords(&[20.0, 0.0, 30.0, 5.0]),
            Event::GeomEnd,
            Event::GeomEnd,
        ],
    ]
    .concat();

    let first = construct(&events);
    let second = construct(&events);
    assert_eq!(first.dimension(), second.dimension());
    assert_abs_diff_eq!(first.area(), second.area(), epsilon = 1e-15);
    assert_abs_diff_eq!(first.length(), second.length(), epsilon = 1e-15);
    assert_abs_diff_eq!(first.centroid(), second.centroid(), epsilon = 1e-15);

    // exported geometry builds into an equal geography
    let rebuilt = construct(&Exporter::new().to_events(&first));
    assert_abs_diff_eq!(first.area(), rebuilt.area(), epsilon = 1e-12);
    assert_abs_diff_eq!(first.perimeter(), rebuilt.perimeter(), epsilon = 1e-12);
}

#[test]
fn empty_handling() {
    let point = construct(&[Event::GeomStart(GeometryType::Point, 0), Event::GeomEnd]);
    assert_eq!(point.dimension(), 0);
    assert_eq!(point.num_points(), 0);
    assert!(point.is_empty());

    let polygon = construct(&[Event::GeomStart(GeometryType::Polygon, 0), Event::GeomEnd]);
    assert_eq!(polygon.dimension(), 2);
    assert_eq!(polygon.area(), 0.0);

    let collection = construct(&[
        Event::GeomStart(GeometryType::GeometryCollection, 0),
        Event::GeomEnd,
    ]);
    assert_eq!(collection.dimension(), -1);
    assert!(!collection.is_collection());
}

#[test]
fn degenerate_ring_is_dropped() {
    let degenerate: &[f64] = &[5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
    let geography = construct(&polygon(&[SQUARE, degenerate]));

    let Geography::Polygon(g) = &geography else {
        panic!("expected a polygon, got {geography:?}");
    };
    assert_eq!(g.polygon().num_loops(), 1);
    assert_abs_diff_eq!(
        geography.area(),
        construct(&polygon(&[SQUARE])).area(),
        epsilon = 1e-15
    );
}

#[test]
fn nested_collection() {
    let geography = construct(&[
        Event::GeomStart(GeometryType::GeometryCollection, 2),
        Event::GeomStart(GeometryType::Point, 1),
        coords(&[0.0, 0.0]),
        Event::GeomEnd,
        Event::GeomStart(GeometryType::LineString, 2),
        coords(&[0.0, 0.0, 1.0, 1.0]),
        Event::GeomEnd,
        Event::GeomEnd,
    ]);

    let Geography::Collection(collection) = &geography else {
        panic!("expected a collection, got {geography:?}");
    };
    assert_eq!(collection.features().len(), 2);
    assert_matches!(collection.features()[0], Geography::Point(_));
    assert_matches!(collection.features()[1], Geography::Polyline(_));
    assert_eq!(geography.dimension(), 1);
    assert!(geography.is_collection());
}

#[test]
fn deeply_nested_collection() {
    let depth = 6;
    let mut events = vec![Event::GeomStart(GeometryType::GeometryCollection, 1); depth];
    events.extend([
        Event::GeomStart(GeometryType::Point, 1),
        coords(&[1.0, 1.0]),
        Event::GeomEnd,
    ]);
    events.extend(vec![Event::GeomEnd; depth]);

    let geography = construct(&events);
    assert_eq!(geography.num_points(), 1);
    assert_events_eq(&Exporter::new().to_events(&geography), &events);
}

#[test]
fn polygon_construction() {
    let geography = construct(&polygon(&[&[
        0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0,
    ]]));

    let Geography::Polygon(g) = &geography else {
        panic!("expected a polygon, got {geography:?}");
    };
    assert_eq!(g.polygon().loops()[0].num_vertices(), 4);
    assert!(geography.is_valid());
    assert!(geography.area() > 0.0);
}

#[test]
fn invalid_loop_rejection() {
    let bowtie = polygon(&[&[0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 0.0, 10.0, 0.0, 0.0]]);

    let err = FeatureConstructor::new(ConstructorOptions::default())
        .construct(&bowtie)
        .expect_err("self intersecting loop");
    assert_matches!(
        err,
        TerrellaError::Construction {
            feature: Some(0),
            source: ConstructionError::InvalidLoop { index: 0, .. },
        }
    );
    assert!(err.to_string().contains("Loop 0"));

    let geography = FeatureConstructor::new(ConstructorOptions::default().with_check(false))
        .construct(&bowtie)
        .expect("validity is not checked");
    assert!(!geography.is_valid());
}
