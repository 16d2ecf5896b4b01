use log::{debug, trace, warn};
use serde::Deserialize;

use crate::error::{Diagnostic, FormatError, ParseError, Result};
use crate::scanner::Scanner;
use crate::scene::{Face, Material, Object, Scene, Vertex, MAX_FACE_VERTICES};

const DOCUMENT_HEADER: &str = "Metasequoia Document";
const FORMAT_HEADER: &str = "Format Text Ver 1.0";

type BlockResult<T> = ::std::result::Result<T, ParseError>;

/// What happens when a block inside the document is malformed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// keep everything parsed so far, record a diagnostic and continue
    #[default]
    Lenient,
    /// fail on the first malformed block
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    pub scene: Scene,
    /// malformed input skipped in lenient mode, in document order
    pub diagnostics: Vec<Diagnostic>,
}

enum MaterialArgument {
    Texture,
    Ignored,
}

impl MaterialArgument {
    fn from_name(name: &str) -> Self {
        match name {
            "tex" => MaterialArgument::Texture,
            _ => MaterialArgument::Ignored,
        }
    }
}

enum FaceArgument {
    Vertices,
    Material,
    TextureCoordinates,
    Ignored,
}

impl FaceArgument {
    fn from_name(name: &str) -> Self {
        match name {
            "V" => FaceArgument::Vertices,
            "M" => FaceArgument::Material,
            "UV" => FaceArgument::TextureCoordinates,
            _ => FaceArgument::Ignored,
        }
    }
}

/// Parses a `.mqo` text document in lenient mode
pub fn parse(data: &[u8]) -> Result<Parsed> {
    parse_with_mode(data, ParseMode::default())
}

// parses metasequoia text documents (https://www.metasequoia.com/en/file-format/)
// only materials, objects, vertices and faces are read, every other block is skipped
pub fn parse_with_mode(data: &[u8], mode: ParseMode) -> Result<Parsed> {
    let text = String::from_utf8_lossy(data);
    let mut parser = Parser {
        scanner: Scanner::new(&text),
        text: &text,
        mode,
        scene: Scene::default(),
        diagnostics: Vec::new(),
        line_mark: (0, 1),
    };

    parser.parse_document()?;

    Ok(Parsed {
        scene: parser.scene,
        diagnostics: parser.diagnostics,
    })
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    text: &'a str,
    mode: ParseMode,
    scene: Scene,
    diagnostics: Vec<Diagnostic>,
    /// byte position and 1-based line of the last line lookup
    line_mark: (usize, usize),
}

impl<'a> Parser<'a> {
    fn line(&mut self) -> usize {
        let position = self.scanner.position();
        let (mark, line) = self.line_mark;

        let line = if position >= mark {
            line + self.text[mark..position].matches('\n').count()
        } else {
            self.text[..position].matches('\n').count() + 1
        };

        self.line_mark = (position, line);
        line
    }

    fn fatal(&mut self, error: ParseError) -> FormatError {
        FormatError::Parse {
            line: self.line(),
            source: error,
        }
    }

    /// Applies the parse mode to a malformed block
    fn report(&mut self, error: ParseError) -> Result<()> {
        let diagnostic = Diagnostic {
            line: self.line(),
            error,
        };

        match self.mode {
            ParseMode::Strict => Err(diagnostic.into()),
            ParseMode::Lenient => {
                warn!("Skipping malformed input at {}", diagnostic);
                self.diagnostics.push(diagnostic);
                Ok(())
            }
        }
    }

    fn parse_document(&mut self) -> Result<()> {
        self.scanner.skip_space();
        let header = self.scanner.read_line();
        if header != DOCUMENT_HEADER {
            return Err(self.fatal(ParseError::InvalidHeader(header.to_owned())));
        }

        self.scanner.skip_space();
        let format = self.scanner.read_line();
        if format != FORMAT_HEADER {
            return Err(self.fatal(ParseError::UnsupportedVersion(format.to_owned())));
        }

        loop {
            match self.scanner.read_word() {
                "" => break,
                "Object" => self.parse_object()?,
                "Material" => self.parse_materials()?,
                // scene, light and other unsupported chunks
                "{" => self.scanner.skip_balanced_block(1),
                word => trace!("Ignoring \"{}\"", word),
            }
        }

        debug!(
            "Parsed {} materials and {} objects",
            self.scene.materials.len(),
            self.scene.objects.len()
        );

        Ok(())
    }

    /// Reads the `<count> {` opening a counted block
    fn block_header(&mut self) -> BlockResult<usize> {
        let count = self.scanner.read_positive_integer()?;
        self.scanner.expect_word("{")?;
        Ok(count)
    }

    /// True if the input ends or the block closes before its next entry
    fn block_ends(&mut self, block: &'static str, declared: usize, found: usize) -> Result<bool> {
        self.scanner.skip_space();

        match self.scanner.peek_char() {
            None => Ok(true),
            Some('}') => {
                self.report(ParseError::TruncatedBlock {
                    block,
                    declared,
                    found,
                })?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn close_block(&mut self, block: &'static str) -> Result<()> {
        let error = match self.scanner.read_word() {
            "}" => return Ok(()),
            "" => ParseError::UnexpectedEnd(block),
            found => ParseError::ExpectedToken {
                expected: "}",
                found: found.to_owned(),
            },
        };

        self.report(error)
    }

    fn parse_materials(&mut self) -> Result<()> {
        let count = match self.block_header() {
            Ok(count) => count,
            Err(error) => return self.report(error),
        };

        let mut materials = Vec::new();
        for _ in 0..count {
            if self.block_ends("Material", count, materials.len())? {
                break;
            }

            let mut material = Material::default();
            let result = parse_material_line(self.scanner.read_line(), &mut material);
            materials.push(material);

            if let Err(error) = result {
                self.report(error)?;
            }
        }

        debug!("Parsed {} materials", materials.len());
        self.scene.materials = materials;
        self.close_block("Material")
    }

    fn parse_object(&mut self) -> Result<()> {
        let mut object = Object::default();
        let result = self.parse_object_body(&mut object);

        debug!(
            "Parsed object \"{}\" with {} vertices and {} faces",
            object.name,
            object.vertices.len(),
            object.faces.len()
        );
        self.scene.objects.push(object);

        result
    }

    fn parse_object_body(&mut self, object: &mut Object) -> Result<()> {
        match self.scanner.read_quote() {
            Ok(name) => object.name = name.to_owned(),
            Err(error) => return self.report(error),
        }

        if let Err(error) = self.scanner.expect_word("{") {
            return self.report(error);
        }

        loop {
            match self.scanner.read_word() {
                "}" => return Ok(()),
                "" => return self.report(ParseError::UnexpectedEnd("Object")),
                "vertex" => self.parse_vertices(object)?,
                "face" => self.parse_faces(object)?,
                // vertexattr and other nested chunks
                "{" => self.scanner.skip_balanced_block(1),
                _ => {}
            }
        }
    }

    fn parse_vertices(&mut self, object: &mut Object) -> Result<()> {
        let count = match self.block_header() {
            Ok(count) => count,
            Err(error) => return self.report(error),
        };

        object.vertices = Vec::new();
        for _ in 0..count {
            if self.block_ends("vertex", count, object.vertices.len())? {
                break;
            }

            match self.read_vertex() {
                Ok(vertex) => object.vertices.push(vertex),
                Err(error) => {
                    self.report(error)?;
                    // the remaining vertices are dropped
                    self.scanner.skip_balanced_block(1);
                    return Ok(());
                }
            }
        }

        self.close_block("vertex")
    }

    fn read_vertex(&mut self) -> BlockResult<Vertex> {
        let x = self.scanner.read_float()?;
        let y = self.scanner.read_float()?;
        let z = self.scanner.read_float()?;
        Ok(Vertex::new(x, y, z))
    }

    fn parse_faces(&mut self, object: &mut Object) -> Result<()> {
        let count = match self.block_header() {
            Ok(count) => count,
            Err(error) => return self.report(error),
        };

        object.faces = Vec::new();
        for _ in 0..count {
            if self.block_ends("face", count, object.faces.len())? {
                break;
            }

            let mut face = Face::default();
            let result = parse_face_line(self.scanner.read_line(), &mut face);
            object.faces.push(face);

            if let Err(error) = result {
                self.report(error)?;
            }
        }

        self.close_block("face")
    }
}

// "name" arg(content) arg(content) ...
fn parse_material_line(line: &str, material: &mut Material) -> BlockResult<()> {
    let mut scanner = Scanner::new(line);
    material.name = scanner.read_quote()?.to_owned();

    while let Some((name, content)) = scanner.read_parenthetic_arg()? {
        match MaterialArgument::from_name(name) {
            MaterialArgument::Texture => {
                material.texture_file = Scanner::new(content).read_quote()?.to_owned();
            }
            MaterialArgument::Ignored => trace!("Ignoring material argument {}", name),
        }
    }

    Ok(())
}

// <vertex count> V(...) M(...) UV(...) ...
fn parse_face_line(line: &str, face: &mut Face) -> BlockResult<()> {
    let mut scanner = Scanner::new(line);
    let count = scanner.read_positive_integer()?;

    while let Some((name, content)) = scanner.read_parenthetic_arg()? {
        match FaceArgument::from_name(name) {
            FaceArgument::Vertices => parse_face_vertices(face, count, content)?,
            FaceArgument::Material => {
                face.material_index = Some(Scanner::new(content).read_positive_integer()?);
            }
            FaceArgument::TextureCoordinates => {
                face.texture_coordinates = Some(parse_face_uvs(count, content)?);
            }
            FaceArgument::Ignored => trace!("Ignoring face argument {}", name),
        }
    }

    Ok(())
}

fn parse_face_vertices(face: &mut Face, count: usize, content: &str) -> BlockResult<()> {
    let fields: Vec<&str> = content
        .splitn(MAX_FACE_VERTICES, |c: char| c.is_ascii_whitespace())
        .collect();

    if fields.len() != count {
        return Err(ParseError::VertexCountMismatch {
            declared: count,
            found: fields.len(),
        });
    }

    for (slot, field) in face.vertex_indices.iter_mut().zip(fields) {
        // non-numeric indices leave the slot empty
        if let Ok(index) = field.parse() {
            *slot = Some(index);
        }
    }

    Ok(())
}

fn parse_face_uvs(count: usize, content: &str) -> BlockResult<Vec<[f32; 2]>> {
    let mut scanner = Scanner::new(content);
    (0..count)
        .map(|_| -> BlockResult<[f32; 2]> {
            Ok([scanner.read_float()?, scanner.read_float()?])
        })
        .collect()
}
