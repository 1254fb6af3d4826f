//! Interaction state for the hero slideshow and the lightbox.
//!
//! Pure state: renderers read `active`/`index`/`is_open` and apply them.

/// Keys the gallery reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Wrap a possibly negative index into `0..len`.
fn wrap(index: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    index.rem_euclid(len as isize) as usize
}

/// `current + delta` wrapped into `0..len`, for any `delta`.
fn offset(current: usize, delta: isize, len: usize) -> usize {
    let delta = delta.rem_euclid(len as isize) as usize;
    (current + delta) % len
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSlideshow {
    len: usize,
    active: usize,
    autoplay: bool,
}

impl HeroSlideshow {
    /// `None` for an empty gallery, which is never rendered.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self {
            len,
            active: 0,
            autoplay: true,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay
    }

    pub fn set(&mut self, index: isize) -> usize {
        self.active = wrap(index, self.len);
        self.active
    }

    pub fn step(&mut self, delta: isize) -> usize {
        self.active = offset(self.active, delta, self.len);
        self.active
    }

    pub fn next(&mut self) -> usize {
        self.step(1)
    }

    pub fn prev(&mut self) -> usize {
        self.step(-1)
    }

    pub fn pause(&mut self) {
        self.autoplay = false;
    }

    pub fn resume(&mut self) {
        self.autoplay = true;
    }

    /// Autoplay tick; advances only while not paused.
    pub fn tick(&mut self) -> Option<usize> {
        self.autoplay.then(|| self.next())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lightbox {
    len: usize,
    index: usize,
    open: bool,
    preloaded: bool,
}

impl Lightbox {
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self {
            len,
            index: 0,
            open: false,
            preloaded: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open at `index`. Returns the images to preload, once per lightbox.
    pub fn open_at(&mut self, index: isize) -> Vec<usize> {
        let preload = if self.preloaded {
            Vec::new()
        } else {
            self.preloaded = true;
            (0..self.len).collect()
        };
        self.show(index);
        self.open = true;
        preload
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Show `index` (wrapped); also the active thumbnail.
    pub fn show(&mut self, index: isize) -> usize {
        self.index = wrap(index, self.len);
        self.index
    }

    pub fn step(&mut self, delta: isize) -> usize {
        self.index = offset(self.index, delta, self.len);
        self.index
    }

    /// Global key handler; ignored while closed.
    pub fn handle_key(&mut self, key: Key) {
        if !self.open {
            return;
        }
        match key {
            Key::Escape => self.close(),
            Key::ArrowLeft => {
                self.step(-1);
            }
            Key::ArrowRight => {
                self.step(1);
            }
            _ => {}
        }
    }
}

/// Everything the page can send to the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    HeroClick,
    HeroKey(Key),
    HeroPrev,
    HeroNext,
    PointerEnter,
    PointerLeave,
    AutoplayTick,
    Thumbnail(usize),
    LightboxPrev,
    LightboxNext,
    LightboxClose,
    BackdropClick,
    Key(Key),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryViewer {
    pub hero: HeroSlideshow,
    pub lightbox: Lightbox,
}

impl GalleryViewer {
    pub fn new(len: usize) -> Option<Self> {
        Some(Self {
            hero: HeroSlideshow::new(len)?,
            lightbox: Lightbox::new(len)?,
        })
    }

    /// Apply one input. Returns image indices that should start preloading.
    pub fn handle(&mut self, input: Input) -> Vec<usize> {
        match input {
            Input::HeroClick | Input::HeroKey(Key::Enter) | Input::HeroKey(Key::Space) => {
                return self.lightbox.open_at(self.hero.active() as isize);
            }
            Input::HeroKey(Key::ArrowLeft) | Input::HeroPrev => {
                self.hero.prev();
            }
            Input::HeroKey(Key::ArrowRight) | Input::HeroNext => {
                self.hero.next();
            }
            Input::HeroKey(_) => {}
            Input::PointerEnter => self.hero.pause(),
            Input::PointerLeave => self.hero.resume(),
            Input::AutoplayTick => {
                self.hero.tick();
            }
            Input::Thumbnail(i) => {
                self.lightbox.show(i as isize);
            }
            Input::LightboxPrev => {
                self.lightbox.step(-1);
            }
            Input::LightboxNext => {
                self.lightbox.step(1);
            }
            Input::LightboxClose | Input::BackdropClick => self.lightbox.close(),
            Input::Key(key) => self.lightbox.handle_key(key),
        }
        Vec::new()
    }
}
