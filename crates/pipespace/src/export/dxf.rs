//! DXF R12 serializer.
//!
//! Every value is written as a group code line followed by a value line.
//! Coordinates use three decimals; the Z component is always `0.0`.

use std::{fmt::Display, io::Write};

use log::{debug, info};

use pipespace_core::drafting::{CadDocument, Entity, EntityKind, Header, Layer, LineType};

use crate::export::{self, Exporter};

/// Standard layer flags.
const TABLE_ENTRY_FLAGS: u16 = 64;
/// Alignment code `A` for line type patterns.
const LINE_TYPE_ALIGNMENT: u16 = 65;

/// Writes [`CadDocument`]s as DXF text to any [`Write`] sink.
///
/// # Examples
///
/// ```
/// # use pipespace::export::dxf::DxfWriter;
/// # use pipespace_core::drafting::{Entity, EntityKind, Layer};
/// # use pipespace_core::geometry::Point;
/// let mut out = Vec::new();
/// let circle = Entity::new(
///     Layer::Pipe,
///     EntityKind::Circle { center: Point::new(84.0, 84.0), radius: 84.0 },
/// );
/// DxfWriter::new(&mut out).write_entity(&circle).unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("0\nCIRCLE\n8\nPIPE\n10\n84.000\n"));
/// ```
pub struct DxfWriter<W: Write> {
    writer: W,
}

impl<W: Write> DxfWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes the whole document: header, tables, entities and terminator.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying writer.
    pub fn write_document(&mut self, doc: &CadDocument) -> std::io::Result<()> {
        self.write_header(doc.header())?;
        self.write_tables(doc.layers())?;

        self.section("ENTITIES")?;
        for entity in doc.entities() {
            self.write_entity(entity)?;
        }
        self.pair(0, "ENDSEC")?;

        self.pair(0, "EOF")?;
        self.writer.flush()
    }

    /// Writes a single entity.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying writer.
    pub fn write_entity(&mut self, entity: &Entity) -> std::io::Result<()> {
        let layer = entity.layer().name();
        match entity.kind() {
            EntityKind::Line { start, end } => {
                self.pair(0, "LINE")?;
                self.pair(8, layer)?;
                self.pair(10, coord(start.x()))?;
                self.pair(20, coord(start.y()))?;
                self.pair(30, "0.0")?;
                self.pair(11, coord(end.x()))?;
                self.pair(21, coord(end.y()))?;
                self.pair(31, "0.0")?;
            }
            EntityKind::Circle { center, radius } => {
                self.pair(0, "CIRCLE")?;
                self.pair(8, layer)?;
                self.pair(10, coord(center.x()))?;
                self.pair(20, coord(center.y()))?;
                self.pair(30, "0.0")?;
                self.pair(40, coord(*radius))?;
            }
            EntityKind::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => {
                self.pair(0, "ARC")?;
                self.pair(8, layer)?;
                self.pair(10, coord(center.x()))?;
                self.pair(20, coord(center.y()))?;
                self.pair(30, "0.0")?;
                self.pair(40, coord(*radius))?;
                self.pair(50, start_angle)?;
                self.pair(51, end_angle)?;
            }
            EntityKind::Text {
                position,
                height,
                rotation,
                value,
            } => {
                self.pair(0, "TEXT")?;
                self.pair(8, layer)?;
                self.pair(10, coord(position.x()))?;
                self.pair(20, coord(position.y()))?;
                self.pair(30, "0.0")?;
                self.pair(40, format!("{height:.1}"))?;
                self.pair(1, value)?;
                self.pair(50, rotation)?;
            }
        }
        Ok(())
    }

    fn write_header(&mut self, header: &Header) -> std::io::Result<()> {
        self.section("HEADER")?;
        self.pair(9, "$ACADVER")?;
        self.pair(1, header.version())?;
        self.pair(9, "$MEASUREMENT")?;
        self.pair(70, u8::from(header.metric()))?;
        self.pair(9, "$INSUNITS")?;
        self.pair(70, header.insertion_units())?;
        self.pair(9, "$AUNITS")?;
        self.pair(70, header.angle_units())?;
        self.pair(0, "ENDSEC")
    }

    fn write_tables(&mut self, layers: &[Layer]) -> std::io::Result<()> {
        self.section("TABLES")?;

        self.table("LTYPE", LineType::DECLARED.len())?;
        for line_type in LineType::DECLARED {
            self.pair(0, "LTYPE")?;
            self.pair(2, line_type.name())?;
            self.pair(70, TABLE_ENTRY_FLAGS)?;
            self.pair(3, line_type.description())?;
            self.pair(72, LINE_TYPE_ALIGNMENT)?;
            self.pair(73, line_type.pattern().len())?;
            self.pair(40, format!("{:.1}", line_type.pattern_length()))?;
            for element in line_type.pattern() {
                self.pair(49, format!("{element:.1}"))?;
            }
        }
        self.pair(0, "ENDTAB")?;

        self.table("LAYER", layers.len())?;
        for layer in layers {
            self.pair(0, "LAYER")?;
            self.pair(2, layer.name())?;
            self.pair(70, TABLE_ENTRY_FLAGS)?;
            self.pair(62, layer.color_index())?;
            self.pair(6, layer.line_type().name())?;
        }
        self.pair(0, "ENDTAB")?;

        self.pair(0, "ENDSEC")
    }

    fn section(&mut self, name: &str) -> std::io::Result<()> {
        self.pair(0, "SECTION")?;
        self.pair(2, name)
    }

    fn table(&mut self, name: &str, entries: usize) -> std::io::Result<()> {
        self.pair(0, "TABLE")?;
        self.pair(2, name)?;
        self.pair(70, entries)
    }

    fn pair(&mut self, code: u16, value: impl Display) -> std::io::Result<()> {
        writeln!(self.writer, "{code}")?;
        writeln!(self.writer, "{value}")
    }
}

impl<W: Write> Exporter for DxfWriter<W> {
    fn export_document(&mut self, doc: &CadDocument) -> Result<(), export::Error> {
        info!(entities = doc.len(); "Writing DXF document");
        self.write_document(doc)?;
        debug!("DXF document written");
        Ok(())
    }
}

/// Serializes `doc` to an in-memory DXF string.
///
/// # Errors
///
/// Returns [`export::Error::Render`] if the output is not valid UTF-8.
pub fn to_dxf_string(doc: &CadDocument) -> Result<String, export::Error> {
    let mut writer = DxfWriter::new(Vec::new());
    writer.export_document(doc)?;
    String::from_utf8(writer.into_inner()).map_err(|err| export::Error::Render(err.to_string()))
}

/// Formats a coordinate with three decimals, never as negative zero.
fn coord(value: f64) -> String {
    let formatted = format!("{value:.3}");
    if formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use pipespace_core::{
        ClearanceMode, PipeDescriptor,
        geometry::Point,
    };

    use super::*;
    use crate::{emit::Emitter, layout::layout, row::Row};

    fn encode(layer: Layer, kind: EntityKind) -> String {
        let mut out = Vec::new();
        DxfWriter::new(&mut out)
            .write_entity(&Entity::new(layer, kind))
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_encode_line() {
        let text = encode(
            Layer::Centerline,
            EntityKind::Line {
                start: Point::new(84.0, 84.0),
                end: Point::new(84.0, 268.0),
            },
        );
        assert_eq!(
            text,
            "0\nLINE\n8\nCENTERLINE\n10\n84.000\n20\n84.000\n30\n0.0\n11\n84.000\n21\n268.000\n31\n0.0\n"
        );
    }

    #[test]
    fn test_encode_circle() {
        let text = encode(
            Layer::PipeInsulation,
            EntityKind::Circle {
                center: Point::new(1.23456, -7.5),
                radius: 109.55,
            },
        );
        assert_eq!(
            text,
            "0\nCIRCLE\n8\nPIPE_INSUL\n10\n1.235\n20\n-7.500\n30\n0.0\n40\n109.550\n"
        );
    }

    #[test]
    fn test_encode_arc_writes_whole_degrees() {
        let text = encode(
            Layer::Pipe,
            EntityKind::Arc {
                center: Point::new(84.0, 126.0),
                radius: 42.0,
                start_angle: 90.0,
                end_angle: 270.0,
            },
        );
        assert_eq!(
            text,
            "0\nARC\n8\nPIPE\n10\n84.000\n20\n126.000\n30\n0.0\n40\n42.000\n50\n90\n51\n270\n"
        );
    }

    #[test]
    fn test_encode_text() {
        let text = encode(
            Layer::Text,
            EntityKind::Text {
                position: Point::new(84.0, 268.0),
                height: 15.0,
                rotation: 90.0,
                value: "Steam 6\"".to_string(),
            },
        );
        assert_eq!(
            text,
            "0\nTEXT\n8\nTEXT\n10\n84.000\n20\n268.000\n30\n0.0\n40\n15.0\n1\nSteam 6\"\n50\n90\n"
        );
    }

    #[test]
    fn test_negative_zero_coordinate() {
        assert_eq!(coord(-0.0), "0.000");
        assert_eq!(coord(-0.0001), "0.000");
        assert_eq!(coord(-0.001), "-0.001");
    }

    #[test]
    fn test_header_and_tables() {
        let text = to_dxf_string(&CadDocument::new()).unwrap();

        assert!(text.starts_with(concat!(
            "0\nSECTION\n2\nHEADER\n",
            "9\n$ACADVER\n1\nAC1009\n",
            "9\n$MEASUREMENT\n70\n1\n",
            "9\n$INSUNITS\n70\n4\n",
            "9\n$AUNITS\n70\n0\n",
            "0\nENDSEC\n",
            "0\nSECTION\n2\nTABLES\n",
            "0\nTABLE\n2\nLTYPE\n70\n1\n",
            "0\nLTYPE\n2\nCENTER\n70\n64\n3\nCenter ____ _ ____ _ ____\n72\n65\n73\n4\n40\n50.0\n",
            "49\n30.0\n49\n-5.0\n49\n5.0\n49\n-5.0\n",
            "0\nENDTAB\n",
            "0\nTABLE\n2\nLAYER\n70\n6\n",
            "0\nLAYER\n2\nPIPE\n70\n64\n62\n7\n6\nCONTINUOUS\n",
        )));
        assert!(text.contains("0\nLAYER\n2\nCENTERLINE\n70\n64\n62\n1\n6\nCENTER\n0\nENDTAB\n0\nENDSEC\n"));
        assert!(text.ends_with("0\nSECTION\n2\nENTITIES\n0\nENDSEC\n0\nEOF\n"));
    }

    #[test]
    fn test_two_pipe_document() {
        let row = Row::new(
            vec![PipeDescriptor::new("A", 168.0), PipeDescriptor::new("B", 168.0)],
            25.0,
            ClearanceMode::PipeToPipe,
        );
        let doc = Emitter::new().emit(&layout(&row).unwrap(), &row).unwrap();
        let text = to_dxf_string(&doc).unwrap();

        assert!(text.contains(
            "0\nSECTION\n2\nENTITIES\n0\nLINE\n8\nPIPE\n10\n0.000\n20\n0.000\n30\n0.0\n11\n363.000\n21\n0.000\n31\n0.0\n"
        ));
        assert!(text.contains("0\nCIRCLE\n8\nPIPE\n10\n279.000\n20\n84.000\n30\n0.0\n40\n84.000\n"));
        assert_eq!(text.matches("\nARC\n").count(), 4);
        assert_eq!(text.matches("\nTEXT\n8\n").count(), 2);
    }

    #[test]
    fn test_export_to_failing_writer_reports_io() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = DxfWriter::new(Broken)
            .export_document(&CadDocument::new())
            .unwrap_err();
        assert!(matches!(err, export::Error::Io(_)));
    }
}
