//! KML export serializer.
//!
//! Turns the user's [`StatusMap`] and the loaded country records into a
//! KML document for Google My Maps: one styled `<Folder>` per status,
//! each holding a `<Placemark>` per country with a `<Polygon>` boundary.
//!
//! Each country contributes a single polygon.  Multi-polygon countries
//! are reduced to one polygon by a [`PolygonSelector`], and only the outer
//! ring of that polygon is written; holes are dropped.  Countries whose
//! geometry yields no usable ring are skipped without a placeholder.
//!
//! Both folders are always present, so the document is well-formed even
//! when nothing is marked.  The output contains no timestamps and is
//! byte-identical for identical inputs.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use std::collections::HashSet;
use std::fmt::Write;

use serde::Serialize;

use beenthere_core::{
    CountryCode, CountryRecord, PolygonSelector, PolygonSelectorKind, Ring, RingSet, Status,
    StatusMap, dominant_ring_set,
};

/// MIME type for uploading the document to a storage service.
pub const KML_MIME_TYPE: &str = "application/vnd.google-earth.kml+xml";

/// KML namespace declared on the root element.
const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Outline colour shared by both styles (opaque black, `aabbggrr`).
const OUTLINE_COLOR: &str = "ff000000";

/// Per-status presentation: style id, folder title and fill colour.
struct GroupStyle {
    status: Status,
    style_id: &'static str,
    folder_name: &'static str,
    /// Translucent fill in KML's `aabbggrr` order.
    fill_color: &'static str,
}

/// Export order: visited first, then wishlist.
const GROUPS: [GroupStyle; 2] = [
    GroupStyle {
        status: Status::Visited,
        style_id: "visitedStyle",
        folder_name: "Visited Countries",
        fill_color: "7d00ff00",
    },
    GroupStyle {
        status: Status::Wishlist,
        style_id: "wishlistStyle",
        folder_name: "Wishlist Countries",
        fill_color: "7d0088ff",
    },
];

/// Header fields of the KML `<Document>`.
///
/// Text values are XML-escaped on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmlMetadata<'a> {
    /// Document name -- emitted as `<name>`.
    pub name: &'a str,
    /// Document description -- emitted as `<description>`.
    pub description: &'a str,
}

impl Default for KmlMetadata<'_> {
    fn default() -> Self {
        Self {
            name: crate::ExportConfig::DEFAULT_DOCUMENT_NAME,
            description: crate::ExportConfig::DEFAULT_DOCUMENT_DESCRIPTION,
        }
    }
}

/// What happened to the countries of one status group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Countries carrying this status in the status map.
    pub marked: usize,
    /// Placemarks written.
    pub emitted: usize,
    /// Matching countries skipped because they had no usable ring.
    pub skipped: usize,
    /// Marked codes with no record in the country set.
    pub unmatched: usize,
}

/// Per-group outcome of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// The "Visited Countries" folder.
    pub visited: GroupSummary,
    /// The "Wishlist Countries" folder.
    pub wishlist: GroupSummary,
}

impl ExportSummary {
    /// Total placemarks written.
    #[must_use]
    pub const fn placemarks(&self) -> usize {
        self.visited.emitted + self.wishlist.emitted
    }

    const fn group_mut(&mut self, status: Status) -> &mut GroupSummary {
        match status {
            Status::Visited => &mut self.visited,
            Status::Wishlist => &mut self.wishlist,
        }
    }
}

/// A rendered KML document with its export summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlDocument {
    /// The KML text.
    pub text: String,
    /// Counts of what was written and skipped.
    pub summary: ExportSummary,
}

/// Escape the five XML special characters for safe embedding in element
/// text content and attribute values.
///
/// `&` is replaced first so the entities produced for the other four are
/// never escaped a second time.
///
/// # Examples
///
/// ```
/// use beenthere_export::xml_escape;
///
/// assert_eq!(xml_escape("Côte d'Ivoire & Co"), "Côte d&apos;Ivoire &amp; Co");
/// ```
#[must_use]
pub fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Build a KML `<coordinates>` string from a ring.
///
/// Each position becomes a `lng,lat,0` triple (the trailing `0` is the
/// altitude KML expects); triples are separated by single spaces.
/// Numbers are written with the shortest representation that parses
/// back to the same `f64`, so no precision is lost.  An empty ring
/// yields an empty string.
///
/// # Examples
///
/// ```
/// use beenthere_core::{Position, Ring};
/// use beenthere_export::encode_ring;
///
/// let ring = Ring::new(vec![Position::new(1.5, 2.5), Position::new(3.5, 4.5)]);
/// assert_eq!(encode_ring(&ring), "1.5,2.5,0 3.5,4.5,0");
/// ```
#[must_use]
pub fn encode_ring(ring: &Ring) -> String {
    let mut out = String::new();
    for (i, p) in ring.positions().iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{},0", p.lng, p.lat);
    }
    out
}

/// Serialize the marked countries into a KML document string using the
/// default [`PolygonSelectorKind`].
///
/// See [`assemble_kml`] for the layout.
///
/// # Examples
///
/// ```
/// use beenthere_core::StatusMap;
/// use beenthere_export::{KmlMetadata, to_kml};
///
/// let kml = to_kml(&StatusMap::new(), &[], &KmlMetadata::default());
/// assert!(kml.contains("<name>Visited Countries</name>"));
/// assert!(kml.contains("<name>Wishlist Countries</name>"));
/// assert!(!kml.contains("<Placemark>"));
/// ```
#[must_use]
pub fn to_kml(
    statuses: &StatusMap,
    countries: &[CountryRecord],
    metadata: &KmlMetadata<'_>,
) -> String {
    assemble_kml(statuses, countries, metadata, &PolygonSelectorKind::default()).text
}

/// Serialize the marked countries into a KML document.
///
/// 1. Codes are partitioned into visited and wishlist in the order they
///    appear in `statuses`.
/// 2. For each group, `countries` is walked in its given order; every
///    record whose code is in the group is reduced to one ring-set by
///    `selector`, and its outer ring is encoded with [`encode_ring`].
/// 3. A non-empty ring becomes a `<Placemark>` with the escaped country
///    name, a `Country code: XX` description and the group's style.
///    Countries with no usable ring are skipped.
///
/// The document always contains both style definitions and both
/// folders.  Marked codes with no country record are counted in the
/// summary but otherwise ignored.
#[must_use]
pub fn assemble_kml(
    statuses: &StatusMap,
    countries: &[CountryRecord],
    metadata: &KmlMetadata<'_>,
    selector: &impl PolygonSelector,
) -> KmlDocument {
    let mut out = String::new();
    let mut summary = ExportSummary::default();

    write_preamble(&mut out, metadata);
    for group in &GROUPS {
        write_style(&mut out, group);
    }

    for group in &GROUPS {
        let members: HashSet<&str> = statuses
            .codes_with(group.status)
            .map(CountryCode::as_str)
            .collect();
        let mut matched: HashSet<&str> = HashSet::with_capacity(members.len());
        let counts = summary.group_mut(group.status);
        counts.marked = members.len();

        let _ = writeln!(out, "    <Folder>");
        let _ = writeln!(out, "      <name>{}</name>", group.folder_name);
        let _ = writeln!(out, "      <open>1</open>");

        for country in countries {
            let code = country.code.as_str();
            if !members.contains(code) {
                continue;
            }
            matched.insert(code);

            let coordinates = dominant_ring_set(&country.geometry, selector)
                .and_then(RingSet::outer)
                .map(encode_ring)
                .unwrap_or_default();
            if coordinates.is_empty() {
                tracing::debug!(%code, status = %group.status, "no usable boundary; skipped");
                counts.skipped += 1;
                continue;
            }

            write_placemark(&mut out, country, group, &coordinates);
            counts.emitted += 1;
        }

        counts.unmatched = members.len() - matched.len();
        if counts.unmatched > 0 {
            tracing::debug!(
                status = %group.status,
                unmatched = counts.unmatched,
                "marked codes with no country record"
            );
        }

        let _ = writeln!(out, "    </Folder>");
    }

    let _ = writeln!(out, "  </Document>");
    let _ = writeln!(out, "</kml>");

    KmlDocument { text: out, summary }
}

/// XML declaration, opening `<kml>` and `<Document>` tags, and the
/// document `<name>` / `<description>`.
fn write_preamble(out: &mut String, metadata: &KmlMetadata<'_>) {
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(out, r#"<kml xmlns="{KML_NAMESPACE}">"#);
    let _ = writeln!(out, "  <Document>");
    let _ = writeln!(out, "    <name>{}</name>", xml_escape(metadata.name));
    let _ = writeln!(
        out,
        "    <description>{}</description>",
        xml_escape(metadata.description)
    );
}

fn write_style(out: &mut String, group: &GroupStyle) {
    let _ = writeln!(out, r#"    <Style id="{}">"#, group.style_id);
    let _ = writeln!(out, "      <PolyStyle>");
    let _ = writeln!(out, "        <color>{}</color>", group.fill_color);
    let _ = writeln!(out, "        <outline>1</outline>");
    let _ = writeln!(out, "        <width>1</width>");
    let _ = writeln!(out, "      </PolyStyle>");
    let _ = writeln!(out, "      <LineStyle>");
    let _ = writeln!(out, "        <color>{OUTLINE_COLOR}</color>");
    let _ = writeln!(out, "        <width>1</width>");
    let _ = writeln!(out, "      </LineStyle>");
    let _ = writeln!(out, "    </Style>");
}

fn write_placemark(out: &mut String, country: &CountryRecord, group: &GroupStyle, coordinates: &str) {
    let _ = writeln!(out, "      <Placemark>");
    let _ = writeln!(out, "        <name>{}</name>", xml_escape(&country.name));
    let _ = writeln!(
        out,
        "        <description>Country code: {}</description>",
        xml_escape(country.code.as_str())
    );
    let _ = writeln!(out, "        <styleUrl>#{}</styleUrl>", group.style_id);
    let _ = writeln!(out, "        <Polygon>");
    let _ = writeln!(out, "          <outerBoundaryIs>");
    let _ = writeln!(out, "            <LinearRing>");
    let _ = writeln!(out, "              <coordinates>{coordinates}</coordinates>");
    let _ = writeln!(out, "            </LinearRing>");
    let _ = writeln!(out, "          </outerBoundaryIs>");
    let _ = writeln!(out, "        </Polygon>");
    let _ = writeln!(out, "      </Placemark>");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use beenthere_core::{Geometry, Position};

    use super::*;

    fn ring(points: &[(f64, f64)]) -> Ring {
        points
            .iter()
            .map(|&(lng, lat)| Position::new(lng, lat))
            .collect()
    }

    fn square() -> Ring {
        ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)])
    }

    fn country(code: &str, name: &str, geometry: Geometry) -> CountryRecord {
        CountryRecord {
            code: CountryCode::new(code),
            name: name.to_owned(),
            geometry,
        }
    }

    fn polygon(r: Ring) -> Geometry {
        Geometry::Polygon(RingSet::new(vec![r]))
    }

    fn statuses(entries: &[(&str, Status)]) -> StatusMap {
        entries
            .iter()
            .map(|(code, status)| (CountryCode::new(*code), *status))
            .collect()
    }

    /// The slice of `kml` between a folder's `<name>` and its `</Folder>`.
    fn folder<'a>(kml: &'a str, name: &str) -> &'a str {
        let start = kml.find(&format!("<name>{name}</name>")).unwrap();
        let end = start + kml[start..].find("</Folder>").unwrap();
        &kml[start..end]
    }

    // --- xml_escape ---

    #[test]
    fn xml_escape_handles_all_special_chars() {
        assert_eq!(xml_escape("&<>\"'"), "&amp;&lt;&gt;&quot;&apos;");
    }

    #[test]
    fn xml_escape_does_not_double_escape() {
        assert_eq!(xml_escape("a &amp; b"), "a &amp;amp; b");
        assert_eq!(xml_escape("<"), "&lt;");
    }

    #[test]
    fn xml_escape_passes_through_plain_text() {
        assert_eq!(xml_escape("São Tomé and Príncipe"), "São Tomé and Príncipe");
    }

    #[test]
    fn xml_escape_empty_string() {
        assert_eq!(xml_escape(""), "");
    }

    // --- encode_ring ---

    #[test]
    fn encode_ring_two_points() {
        let r = ring(&[(1.5, 2.5), (3.5, 4.5)]);
        assert_eq!(encode_ring(&r), "1.5,2.5,0 3.5,4.5,0");
    }

    #[test]
    fn encode_ring_empty() {
        assert_eq!(encode_ring(&Ring::default()), "");
    }

    #[test]
    fn encode_ring_keeps_full_precision() {
        let r = ring(&[(-61.686_668_62, 17.024_39), (0.1 + 0.2, -90.0)]);
        assert_eq!(
            encode_ring(&r),
            "-61.68666862,17.02439,0 0.30000000000000004,-90,0"
        );
    }

    // --- assemble_kml ---

    #[test]
    fn empty_status_map_has_both_empty_folders() {
        let kml = to_kml(&StatusMap::new(), &[], &KmlMetadata::default());
        assert!(kml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(kml.contains(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#));
        assert!(folder(&kml, "Visited Countries").trim_end().ends_with("<open>1</open>"));
        assert!(folder(&kml, "Wishlist Countries").trim_end().ends_with("<open>1</open>"));
        assert_eq!(kml.matches("<Folder>").count(), 2);
        assert_eq!(kml.matches("</Folder>").count(), 2);
        assert!(kml.trim_end().ends_with("</kml>"));
    }

    #[test]
    fn styles_are_defined_once_each() {
        let kml = to_kml(&StatusMap::new(), &[], &KmlMetadata::default());
        assert_eq!(kml.matches(r#"<Style id="visitedStyle">"#).count(), 1);
        assert_eq!(kml.matches(r#"<Style id="wishlistStyle">"#).count(), 1);
        assert!(kml.contains("<color>7d00ff00</color>"));
        assert!(kml.contains("<color>7d0088ff</color>"));
    }

    #[test]
    fn visited_and_empty_wishlist_geometry() {
        let countries = vec![
            country("FR", "France", polygon(square())),
            country("JP", "Japan", Geometry::MultiPolygon(Vec::new())),
        ];
        let map = statuses(&[("FR", Status::Visited), ("JP", Status::Wishlist)]);
        let doc = assemble_kml(
            &map,
            &countries,
            &KmlMetadata::default(),
            &PolygonSelectorKind::default(),
        );

        let visited = folder(&doc.text, "Visited Countries");
        let wishlist = folder(&doc.text, "Wishlist Countries");
        assert_eq!(visited.matches("<Placemark>").count(), 1);
        assert!(visited.contains("<name>France</name>"));
        assert!(visited.contains("<description>Country code: FR</description>"));
        assert!(visited.contains("<styleUrl>#visitedStyle</styleUrl>"));
        assert!(visited.contains("<coordinates>0,0,0 1,0,0 1,1,0 0,1,0 0,0,0</coordinates>"));
        assert_eq!(wishlist.matches("<Placemark>").count(), 0);

        assert_eq!(doc.summary.visited.emitted, 1);
        assert_eq!(doc.summary.wishlist.skipped, 1);
        assert_eq!(doc.summary.placemarks(), 1);
    }

    #[test]
    fn names_are_escaped() {
        let countries = vec![country("CI", "Côte d'Ivoire & Co", polygon(square()))];
        let map = statuses(&[("CI", Status::Visited)]);
        let kml = to_kml(&map, &countries, &KmlMetadata::default());
        assert!(kml.contains("<name>Côte d&apos;Ivoire &amp; Co</name>"));
        assert!(!kml.contains("&amp;amp;"));
    }

    #[test]
    fn metadata_is_escaped() {
        let meta = KmlMetadata {
            name: "Trips <2024>",
            description: "Mine & yours",
        };
        let kml = to_kml(&StatusMap::new(), &[], &meta);
        assert!(kml.contains("<name>Trips &lt;2024&gt;</name>"));
        assert!(kml.contains("<description>Mine &amp; yours</description>"));
    }

    #[test]
    fn unknown_code_is_ignored() {
        let countries = vec![country("FR", "France", polygon(square()))];
        let map = statuses(&[("ZZ", Status::Visited), ("FR", Status::Visited)]);
        let doc = assemble_kml(
            &map,
            &countries,
            &KmlMetadata::default(),
            &PolygonSelectorKind::default(),
        );
        assert_eq!(doc.text.matches("<Placemark>").count(), 1);
        assert_eq!(doc.summary.visited.marked, 2);
        assert_eq!(doc.summary.visited.unmatched, 1);
    }

    #[test]
    fn placemarks_follow_country_order() {
        let countries = vec![
            country("AR", "Argentina", polygon(square())),
            country("BR", "Brazil", polygon(square())),
        ];
        // Marked in the opposite order.
        let map = statuses(&[("BR", Status::Visited), ("AR", Status::Visited)]);
        let kml = to_kml(&map, &countries, &KmlMetadata::default());
        let ar = kml.find("<name>Argentina</name>").unwrap();
        let br = kml.find("<name>Brazil</name>").unwrap();
        assert!(ar < br);
    }

    #[test]
    fn visited_folder_precedes_wishlist_folder() {
        let countries = vec![
            country("AR", "Argentina", polygon(square())),
            country("BR", "Brazil", polygon(square())),
        ];
        let map = statuses(&[("AR", Status::Wishlist), ("BR", Status::Visited)]);
        let kml = to_kml(&map, &countries, &KmlMetadata::default());
        let brazil = kml.find("<name>Brazil</name>").unwrap();
        let wishlist = kml.find("<name>Wishlist Countries</name>").unwrap();
        let argentina = kml.find("<name>Argentina</name>").unwrap();
        assert!(brazil < wishlist);
        assert!(wishlist < argentina);
        assert!(kml[argentina..].contains("#wishlistStyle"));
    }

    #[test]
    fn only_outer_ring_is_encoded() {
        let hole = ring(&[(0.25, 0.25), (0.5, 0.25), (0.25, 0.5), (0.25, 0.25)]);
        let countries = vec![country(
            "LS",
            "Lesotho",
            Geometry::Polygon(RingSet::new(vec![square(), hole])),
        )];
        let map = statuses(&[("LS", Status::Visited)]);
        let kml = to_kml(&map, &countries, &KmlMetadata::default());
        assert!(!kml.contains("0.25"));
        assert!(!kml.contains("innerBoundaryIs"));
    }

    #[test]
    fn multipolygon_exports_largest_by_vertex_count() {
        let small = RingSet::new(vec![ring(&[(10.0, 10.0), (11.0, 10.0), (10.0, 11.0)])]);
        let large = RingSet::new(vec![square()]);
        let countries = vec![country(
            "JP",
            "Japan",
            Geometry::MultiPolygon(vec![small, large]),
        )];
        let map = statuses(&[("JP", Status::Wishlist)]);
        let kml = to_kml(&map, &countries, &KmlMetadata::default());
        assert!(kml.contains("<coordinates>0,0,0 1,0,0 1,1,0 0,1,0 0,0,0</coordinates>"));
        assert!(!kml.contains("10,10,0"));
    }

    #[test]
    fn area_selector_is_honoured() {
        let coarse_large = RingSet::new(vec![ring(&[
            (0.0, 0.0),
            (50.0, 0.0),
            (50.0, 50.0),
            (0.0, 0.0),
        ])]);
        let fine_small = RingSet::new(vec![square()]);
        let countries = vec![country(
            "ID",
            "Indonesia",
            Geometry::MultiPolygon(vec![coarse_large, fine_small]),
        )];
        let map = statuses(&[("ID", Status::Visited)]);
        let doc = assemble_kml(
            &map,
            &countries,
            &KmlMetadata::default(),
            &PolygonSelectorKind::Area,
        );
        assert!(doc.text.contains("50,50,0"));
    }

    #[test]
    fn output_is_deterministic() {
        let countries = vec![
            country("FR", "France", polygon(square())),
            country("PE", "Peru", polygon(square())),
        ];
        let map = statuses(&[("PE", Status::Wishlist), ("FR", Status::Visited)]);
        let first = to_kml(&map, &countries, &KmlMetadata::default());
        let second = to_kml(&map, &countries, &KmlMetadata::default());
        assert_eq!(first, second);
    }

    #[test]
    fn exact_document_for_single_country() {
        let countries = vec![country(
            "FR",
            "France",
            polygon(ring(&[(1.5, 2.5), (3.5, 4.5)])),
        )];
        let map = statuses(&[("FR", Status::Visited)]);
        let kml = to_kml(&map, &countries, &KmlMetadata::default());

        let expected = r##"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>MyCountries</name>
    <description>Countries I&apos;ve visited and want to visit</description>
    <Style id="visitedStyle">
      <PolyStyle>
        <color>7d00ff00</color>
        <outline>1</outline>
        <width>1</width>
      </PolyStyle>
      <LineStyle>
        <color>ff000000</color>
        <width>1</width>
      </LineStyle>
    </Style>
    <Style id="wishlistStyle">
      <PolyStyle>
        <color>7d0088ff</color>
        <outline>1</outline>
        <width>1</width>
      </PolyStyle>
      <LineStyle>
        <color>ff000000</color>
        <width>1</width>
      </LineStyle>
    </Style>
    <Folder>
      <name>Visited Countries</name>
      <open>1</open>
      <Placemark>
        <name>France</name>
        <description>Country code: FR</description>
        <styleUrl>#visitedStyle</styleUrl>
        <Polygon>
          <outerBoundaryIs>
            <LinearRing>
              <coordinates>1.5,2.5,0 3.5,4.5,0</coordinates>
            </LinearRing>
          </outerBoundaryIs>
        </Polygon>
      </Placemark>
    </Folder>
    <Folder>
      <name>Wishlist Countries</name>
      <open>1</open>
    </Folder>
  </Document>
</kml>
"##;
        assert_eq!(kml, expected);
    }
}
