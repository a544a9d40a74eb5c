//! Conversion between geographies and the formats supported by [geozero].

use geozero::geojson::{GeoJson, GeoJsonWriter};
use geozero::{FeatureProcessor, GeozeroDatasource, GeozeroGeometry};

use crate::constructor::{ConstructorOptions, FeatureBatch, FeatureConstructor, FeatureReader};
use crate::error::TerrellaError;
use crate::export::Exporter;
use crate::handler::GeometryHandler;
use crate::Geography;

mod reader;
mod writer;

pub use reader::GeozeroReader;
pub use writer::GeozeroWriter;

/// Builds a geography from a GeoJSON geometry with longitude/latitude coordinates.
pub fn read_geojson(json: &str, options: ConstructorOptions) -> Result<Geography, TerrellaError> {
    let mut reader = GeozeroReader::new(FeatureConstructor::new(options));
    reader.handler_mut().feat_start(0)?;

    if let Err(err) = GeoJson(json).process_geom(&mut reader) {
        return Err(reader.take_error().unwrap_or_else(|| err.into()));
    }

    let mut constructor = reader.into_inner();
    constructor.feat_end(0)?;
    constructor.finish_feature()
}

/// Builds a geography for every feature of a GeoJSON `FeatureCollection` or `Feature`.
///
/// Properties are ignored.
pub fn read_geojson_features(json: &str, reader: FeatureReader) -> Result<FeatureBatch, TerrellaError> {
    let mut reader = GeozeroReader::new(reader);

    if let Err(err) = GeoJson(json).process(&mut reader) {
        return Err(reader.take_error().unwrap_or_else(|| err.into()));
    }

    Ok(reader.handler_mut().take_batch())
}

/// Writes the geographies as a GeoJSON `FeatureCollection` without properties.
pub fn write_geojson_features<'a>(
    features: impl IntoIterator<Item = &'a Geography>,
) -> Result<String, TerrellaError> {
    let exporter = Exporter::new();
    let mut out = Vec::new();
    {
        let mut writer = GeozeroWriter::new(GeoJsonWriter::new(&mut out));
        writer.processor_mut().dataset_begin(None)?;
        for (id, geography) in features.into_iter().enumerate() {
            exporter.export_feature(id, geography, &mut writer)?;
        }
        writer.processor_mut().dataset_end()?;
    }

    String::from_utf8(out).map_err(|err| TerrellaError::Source(err.to_string()))
}

impl Geography {
    /// Writes the geography as a GeoJSON geometry with longitude/latitude coordinates.
    pub fn to_geojson(&self) -> Result<String, TerrellaError> {
        let mut out = Vec::new();
        {
            let mut writer = GeozeroWriter::new(GeoJsonWriter::new(&mut out));
            Exporter::new().export(self, &mut writer)?;
        }

        String::from_utf8(out).map_err(|err| TerrellaError::Source(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::ConstructionError;

    #[test]
    fn geometry() {
        let geography = read_geojson(
            r#"{"type": "LineString", "coordinates": [[0, 0], [10, 0], [10, 10]]}"#,
            ConstructorOptions::default(),
        )
        .expect("valid line");
        assert_eq!(geography.dimension(), 1);
        assert_eq!(geography.num_points(), 3);
    }

    #[test]
    fn invalid_loop() {
        let err = read_geojson(
            r#"{"type": "Polygon", "coordinates": [[[0, 0], [10, 10], [10, 0], [0, 10], [0, 0]]]}"#,
            ConstructorOptions::default(),
        )
        .expect_err("self intersecting ring");
        assert_matches!(
            err,
            TerrellaError::Construction {
                feature: Some(0),
                source: ConstructionError::InvalidLoop { index: 0, .. },
            }
        );
    }

    #[test]
    fn feature_collection() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"name": "a"}, "geometry": {"type": "Point", "coordinates": [1, 2]}},
            {"type": "Feature", "properties": {}, "geometry":
                {"type": "Polygon", "coordinates": [[[0, 0], [10, 10], [10, 0], [0, 10], [0, 0]]]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}
        ]}"#;

        let reader = FeatureReader::new(ConstructorOptions::default()).with_skip_invalid(true);
        let batch = read_geojson_features(json, reader).expect("invalid features are skipped");
        let ids: Vec<_> = batch.features.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, [0, 2]);
        assert_eq!(batch.errors.len(), 1);

        let reader = FeatureReader::new(ConstructorOptions::default());
        let err = read_geojson_features(json, reader).expect_err("invalid feature");
        assert_matches!(err, TerrellaError::Construction { feature: Some(1), .. });
    }

    #[test]
    fn write_features() {
        let point = read_geojson(
            r#"{"type": "Point", "coordinates": [1, 2]}"#,
            ConstructorOptions::default(),
        )
        .expect("valid point");

        let json = write_geojson_features([&point, &point]).expect("valid output");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["features"][1]["geometry"]["type"], "Point");
    }
}
