//! Reaction-driven pagination over a fixed number of items.

use std::fmt;
use std::sync::Arc;

use crate::interaction::Actor;
use crate::interaction::kind::Transition;
use crate::interaction::render::MessageContent;
use crate::interaction::render::RenderCommand;
use crate::interaction::render::RenderStep;

pub const PREV: &str = "⬅️";
pub const NEXT: &str = "➡️";
pub const EMOJIS: &[&str] = &[PREV, NEXT];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageInput {
    Prev,
    Next,
}

impl PageInput {
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            PREV => Some(Self::Prev),
            NEXT => Some(Self::Next),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Prev => PREV,
            Self::Next => NEXT,
        }
    }
}

/// Renders the page starting at the given item index.
pub type PageRenderer = Arc<dyn Fn(usize) -> MessageContent + Send + Sync>;

/// Pagination state. `current_index` is the index of the first item on the
/// current page and always stays below `total_items` (or at 0 when empty).
#[derive(Clone)]
pub struct PaginatorState {
    pub current_index: usize,
    pub total_items: usize,
    pub page_size: usize,
    render: PageRenderer,
}

impl PaginatorState {
    pub fn new(
        total_items: usize,
        page_size: usize,
        render: impl Fn(usize) -> MessageContent + Send + Sync + 'static,
    ) -> Self {
        Self {
            current_index: 0,
            total_items,
            page_size: page_size.max(1),
            render: Arc::new(render),
        }
    }

    pub fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    /// 1-based number of the current page.
    pub fn page_number(&self) -> usize {
        self.current_index / self.page_size + 1
    }

    pub fn is_multipage(&self) -> bool {
        self.page_count() > 1
    }

    pub fn render_current(&self) -> MessageContent {
        (self.render)(self.current_index)
    }
}

impl fmt::Debug for PaginatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatorState")
            .field("current_index", &self.current_index)
            .field("total_items", &self.total_items)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// Moves one page in either direction, clamping at both ends.
///
/// Never terminal. The actor's arrow is always retracted so it can be
/// pressed again; the message is only edited when the page changed.
pub fn transition(
    state: &PaginatorState,
    actor: &Actor,
    input: PageInput,
) -> Transition<PaginatorState> {
    let next_index = match input {
        PageInput::Next => match state.current_index.checked_add(state.page_size) {
            Some(candidate) if candidate < state.total_items => candidate,
            _ => state.current_index,
        },
        PageInput::Prev => state.current_index.saturating_sub(state.page_size),
    };

    let next_state = PaginatorState {
        current_index: next_index,
        ..state.clone()
    };

    let mut render = RenderCommand::none();
    if next_index != state.current_index {
        render = render.then(RenderStep::Edit(next_state.render_current()));
    }
    render = render.then(RenderStep::RemoveReaction {
        emoji: input.emoji().to_string(),
        user_id: actor.user_id,
    });

    Transition::Continue {
        state: next_state,
        render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(total: usize, page_size: usize) -> PaginatorState {
        PaginatorState::new(total, page_size, |index| {
            MessageContent::text(format!("from {}", index))
        })
    }

    fn press(state: &PaginatorState, input: PageInput) -> (PaginatorState, RenderCommand) {
        match transition(state, &Actor::new(1, "reader"), input) {
            Transition::Continue { state, render } => (state, render),
            Transition::Terminal { .. } => panic!("Paginator must never terminate"),
        }
    }

    #[test]
    fn test_next_clamps_at_last_page() {
        let state = numbered(5, 2);

        let (state, _) = press(&state, PageInput::Next);
        assert_eq!(state.current_index, 2);
        let (state, _) = press(&state, PageInput::Next);
        assert_eq!(state.current_index, 4);
        let (state, render) = press(&state, PageInput::Next);
        assert_eq!(state.current_index, 4);

        // Unchanged page: only the arrow is retracted.
        assert_eq!(
            render.steps(),
            &[RenderStep::RemoveReaction {
                emoji: NEXT.to_string(),
                user_id: 1
            }]
        );
    }

    #[test]
    fn test_prev_clamps_at_zero() {
        let state = numbered(5, 2);
        let (state, render) = press(&state, PageInput::Prev);
        assert_eq!(state.current_index, 0);
        assert_eq!(render.steps().len(), 1);
    }

    #[test]
    fn test_page_change_edits_message() {
        let state = numbered(12, 5);
        let (state, render) = press(&state, PageInput::Next);
        assert_eq!(state.page_number(), 2);
        assert_eq!(
            render.steps()[0],
            RenderStep::Edit(MessageContent::text("from 5"))
        );
    }

    #[test]
    fn test_next_with_huge_page_size_stays_put() {
        let mut state = numbered(usize::MAX, usize::MAX / 2 + 1);
        state.current_index = usize::MAX / 2 + 1;
        let (next, render) = press(&state, PageInput::Next);
        assert_eq!(next.current_index, usize::MAX / 2 + 1);
        assert_eq!(render.steps().len(), 1);
    }

    #[test]
    fn test_index_never_leaves_bounds() {
        for total in 0..12 {
            for page_size in 1..5 {
                let mut state = numbered(total, page_size);
                for input in [PageInput::Next; 10]
                    .into_iter()
                    .chain([PageInput::Prev; 10])
                    .chain([PageInput::Next; 3])
                {
                    state = press(&state, input).0;
                    assert!(state.current_index == 0 || state.current_index < total);
                }
            }
        }
    }

    #[test]
    fn test_page_count() {
        assert_eq!(numbered(0, 5).page_count(), 1);
        assert_eq!(numbered(5, 5).page_count(), 1);
        assert_eq!(numbered(6, 5).page_count(), 2);
        assert!(!numbered(5, 5).is_multipage());
        assert!(numbered(6, 5).is_multipage());
    }
}
