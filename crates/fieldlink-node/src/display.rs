/// Status display consumed by the interpreter.
///
/// A presentation shim: the node only ever asks for boot text, the ID
/// screen, or two lines of status. Draw calls are best-effort and the
/// node never checks whether they rendered.
pub trait StatusDisplay {
    /// Is a display attached and initialized?
    fn available(&self) -> bool;

    /// Draw a boot/status message.
    fn draw_boot(&mut self, msg: &str);

    /// Draw the node ID screen.
    fn draw_id(&mut self, id: &str);

    /// Draw two arbitrary status lines.
    fn draw_two_lines(&mut self, line1: &str, line2: &str);
}

/// The no-display variant: reports unavailable, draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl StatusDisplay for NullDisplay {
    fn available(&self) -> bool {
        false
    }

    fn draw_boot(&mut self, _msg: &str) {}

    fn draw_id(&mut self, _id: &str) {}

    fn draw_two_lines(&mut self, _line1: &str, _line2: &str) {}
}
