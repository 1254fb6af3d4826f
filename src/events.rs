/// The hero slideshow now shows this image index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChanged(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideshowControl {
    /// Pointer entered the hero area.
    Pause,
    /// Pointer left the hero area.
    Resume,
    Goto(usize),
    Step(isize),
}
