//! Scroll-follow: decide whether a message pane should snap to its newest
//! content or back to the top.

/// Where the pane should animate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    ToBottom,
    ToTop,
}

impl ScrollDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDecision::ToBottom => "bottom",
            ScrollDecision::ToTop => "top",
        }
    }
}

/// `None` means the pane has no measurable content height yet (hidden or
/// not rendered) and the caller must skip animating entirely rather than
/// forcing the pane to the top.
pub fn scroll_decision(
    content_height: Option<f64>,
    client_height: f64,
) -> Option<ScrollDecision> {
    let content = content_height?;
    if content > client_height {
        Some(ScrollDecision::ToBottom)
    } else {
        Some(ScrollDecision::ToTop)
    }
}
