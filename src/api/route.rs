//! Route computation and the navigation sink.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::info;

/// Characters escaped inside a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// A navigation target on the reading site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A title's detail page.
    Title {
        /// Title slug (falls back to the id upstream when absent).
        slug: String,
    },
    /// A chapter inside the reader.
    Chapter {
        /// Title slug.
        slug: String,
        /// Chapter id.
        chapter_id: String,
    },
}

impl Route {
    /// Compute the site path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Title { slug } => {
                format!("/title/{}", utf8_percent_encode(slug, SEGMENT))
            }
            Self::Chapter { slug, chapter_id } => format!(
                "/title/{}/chapter/{}",
                utf8_percent_encode(slug, SEGMENT),
                utf8_percent_encode(chapter_id, SEGMENT)
            ),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Sink for navigation intents.
///
/// The only side effect the shelf produces outside its own state is a
/// route push; what happens to the route (a page load, a log line) is the
/// sink's business.
pub trait Navigator: Send {
    /// Push a route.
    fn push(&mut self, route: Route);
}

/// Navigator that remembers every pushed route.
///
/// The TUI shows the most recent route in its status bar; tests assert on
/// the full list.
#[derive(Debug, Default)]
pub struct RouteRecorder {
    routes: Vec<Route>,
}

impl RouteRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route pushed so far, oldest first.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The most recently pushed route.
    #[must_use]
    pub fn last(&self) -> Option<&Route> {
        self.routes.last()
    }
}

impl Navigator for RouteRecorder {
    fn push(&mut self, route: Route) {
        info!(path = %route.path(), "navigate");
        self.routes.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_path() {
        let route = Route::Title {
            slug: "tower-of-dawn".to_string(),
        };
        assert_eq!(route.path(), "/title/tower-of-dawn");
    }

    #[test]
    fn test_chapter_path() {
        let route = Route::Chapter {
            slug: "moon-sword".to_string(),
            chapter_id: "ch-90".to_string(),
        };
        assert_eq!(route.path(), "/title/moon-sword/chapter/ch-90");
    }

    #[test]
    fn test_path_escapes_awkward_slugs() {
        let route = Route::Title {
            slug: "solo leveling #2".to_string(),
        };
        assert_eq!(route.path(), "/title/solo%20leveling%20%232");
    }

    #[test]
    fn test_recorder_keeps_order() {
        let mut nav = RouteRecorder::new();
        nav.push(Route::Title {
            slug: "a".to_string(),
        });
        nav.push(Route::Title {
            slug: "b".to_string(),
        });
        assert_eq!(nav.routes().len(), 2);
        assert_eq!(nav.last().unwrap().path(), "/title/b");
    }
}
