//! A browser with no window, for terminal hosts and tests.
//!
//! [`HeadlessBrowser`] does not fetch or render anything.  It records the URL
//! it was pointed at and how often it was asked to reload; the page's
//! messages arrive from elsewhere (see `message_pump`).

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::application::component::EmbeddedBrowser;
use crate::domain::view::BrowserView;

#[derive(Debug)]
pub struct HeadlessBrowser {
    url: String,
    reloads: AtomicUsize,
}

impl HeadlessBrowser {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reloads: AtomicUsize::new(0),
        }
    }

    /// Creates a browser for a rendered [`BrowserView`].
    pub fn for_view(view: &BrowserView) -> Self {
        Self::new(view.url.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::Relaxed)
    }
}

impl EmbeddedBrowser for HeadlessBrowser {
    fn reload(&self) {
        let n = self.reloads.fetch_add(1, Ordering::Relaxed) + 1;
        info!("reloading {} (reload #{n})", self.url);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
