/// Accumulating statement buffer. One writer belongs to exactly one
/// compilation call and is consumed by [`TypeQlWriter::finish`].
#[derive(Debug, Default)]
pub struct TypeQlWriter {
    buffer: String,
    depth: usize,
}

const INDENT: &str = "    ";

impl TypeQlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(text.as_ref());
        self.buffer.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Render a statement node as TypeQL text.
pub trait ToTypeQl {
    fn write_typeql(&self, writer: &mut TypeQlWriter);

    fn to_typeql(&self) -> String {
        let mut writer = TypeQlWriter::new();
        self.write_typeql(&mut writer);
        writer.finish()
    }
}
