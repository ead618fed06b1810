use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument};

/// Replies may target top-level comments and their direct replies only.
pub const MAX_REPLY_PARENT_DEPTH: usize = 1;
pub const LOCAL_AUTHOR: &str = "Me";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommentId(pub String);

impl CommentId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentError {
    #[error("comment not found: {0}")]
    NotFound(CommentId),

    #[error("comment text cannot be empty")]
    EmptyText,

    #[error("comment {id} is nested {depth} levels deep and cannot take replies")]
    TooDeep { id: CommentId, depth: usize },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub text: String,
    pub like_count: u32,
    pub liked: bool,
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn new(id: CommentId, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            author: author.into(),
            text: text.into(),
            like_count: 0,
            liked: false,
            replies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_likes(mut self, like_count: u32) -> Self {
        self.like_count = like_count;
        self
    }

    #[must_use]
    pub fn with_reply(mut self, reply: Comment) -> Self {
        self.replies.push(reply);
        self
    }

    pub fn toggle_like(&mut self) {
        flip_like(&mut self.liked, &mut self.like_count);
    }

    /// First character of the author, used for the avatar.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.author.chars().next()
    }
}

/// Flips `liked` and moves `count` by one in the same direction, never below 0.
pub(crate) fn flip_like(liked: &mut bool, count: &mut u32) {
    *liked = !*liked;
    *count = if *liked {
        count.saturating_add(1)
    } else {
        count.saturating_sub(1)
    };
}

/// In-memory comment tree for the comments sheet.
#[derive(Clone, Debug)]
pub struct CommentThread {
    comments: Vec<Comment>,
    last_id_ms: u64,
    clock: fn() -> u64,
}

impl Default for CommentThread {
    fn default() -> Self {
        Self::with_clock(crate::get_current_time_ms)
    }
}

impl PartialEq for CommentThread {
    fn eq(&self, other: &Self) -> bool {
        self.comments == other.comments
    }
}

impl CommentThread {
    #[must_use]
    pub fn with_clock(clock: fn() -> u64) -> Self {
        Self {
            comments: Vec::new(),
            last_id_ms: 0,
            clock,
        }
    }

    /// The thread shown when the comments sheet opens.
    #[must_use]
    pub fn seeded() -> Self {
        let mut thread = Self::default();
        thread.comments = vec![
            Comment::new(CommentId::new("1"), "Alice", "Great shot! 📸")
                .with_likes(12)
                .with_reply(Comment::new(
                    CommentId::new("1-1"),
                    "Bob",
                    "Agreed! The lighting is perfect.",
                )),
            Comment::new(CommentId::new("2"), "Charlie", "Where was this taken?").with_likes(5),
            Comment::new(CommentId::new("3"), "Dave", "Amazing!").with_likes(2),
            Comment::new(CommentId::new("4"), "Eve", "Saved to my board."),
        ];
        thread
    }

    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: &CommentId) -> Option<&Comment> {
        find_in(&self.comments, id, 0).map(|(comment, _)| comment)
    }

    fn next_id(&mut self) -> CommentId {
        let now = (self.clock)();
        let id = now.max(self.last_id_ms + 1);
        self.last_id_ms = id;
        CommentId(id.to_string())
    }

    /// Prepends a new top-level comment.
    #[instrument(skip(self, author, text))]
    pub fn add_top_level(
        &mut self,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<CommentId, CommentError> {
        let text = non_blank(text.into())?;
        let id = self.next_id();
        self.comments.insert(0, Comment::new(id.clone(), author, text));
        debug!(id = %id, total = self.comments.len(), "comment added");
        Ok(id)
    }

    /// Appends a reply to `parent_id`, searched at every depth.
    #[instrument(skip(self, author, text), fields(parent = %parent_id))]
    pub fn add_reply(
        &mut self,
        parent_id: &CommentId,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<CommentId, CommentError> {
        let text = non_blank(text.into())?;

        let depth = find_in(&self.comments, parent_id, 0)
            .map(|(_, depth)| depth)
            .ok_or_else(|| CommentError::NotFound(parent_id.clone()))?;
        if depth > MAX_REPLY_PARENT_DEPTH {
            return Err(CommentError::TooDeep {
                id: parent_id.clone(),
                depth,
            });
        }

        let id = self.next_id();
        let parent = find_in_mut(&mut self.comments, parent_id)
            .ok_or_else(|| CommentError::NotFound(parent_id.clone()))?;
        parent.replies.push(Comment::new(id.clone(), author, text));
        debug!(id = %id, replies = parent.replies.len(), "reply added");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub fn toggle_like(&mut self, id: &CommentId) -> Result<(), CommentError> {
        let comment =
            find_in_mut(&mut self.comments, id).ok_or_else(|| CommentError::NotFound(id.clone()))?;
        comment.toggle_like();
        debug!(liked = comment.liked, like_count = comment.like_count, "comment like toggled");
        Ok(())
    }
}

fn non_blank(text: String) -> Result<String, CommentError> {
    if text.trim().is_empty() {
        Err(CommentError::EmptyText)
    } else {
        Ok(text)
    }
}

fn find_in<'a>(
    comments: &'a [Comment],
    id: &CommentId,
    depth: usize,
) -> Option<(&'a Comment, usize)> {
    comments.iter().find_map(|comment| {
        if &comment.id == id {
            Some((comment, depth))
        } else {
            find_in(&comment.replies, id, depth + 1)
        }
    })
}

fn find_in_mut<'a>(comments: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    for comment in comments.iter_mut() {
        if &comment.id == id {
            return Some(comment);
        }
        if let Some(found) = find_in_mut(&mut comment.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Draft text and reply target of the comment input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentComposer {
    draft: String,
    replying_to: Option<CommentId>,
}

impl CommentComposer {
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[must_use]
    pub fn replying_to(&self) -> Option<&CommentId> {
        self.replying_to.as_ref()
    }

    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn reply_to(&mut self, thread: &CommentThread, id: &CommentId) -> Result<(), CommentError> {
        if thread.find(id).is_none() {
            return Err(CommentError::NotFound(id.clone()));
        }
        self.replying_to = Some(id.clone());
        Ok(())
    }

    pub fn cancel_reply(&mut self) {
        self.replying_to = None;
    }

    pub fn clear(&mut self) {
        self.draft.clear();
        self.replying_to = None;
    }

    /// Posts the draft as a reply or a top-level comment, clearing the
    /// composer on success. On failure the draft is kept.
    pub fn submit(
        &mut self,
        thread: &mut CommentThread,
        author: &str,
    ) -> Result<CommentId, CommentError> {
        let id = match &self.replying_to {
            Some(parent) => thread.add_reply(parent, author, self.draft.as_str())?,
            None => thread.add_top_level(author, self.draft.as_str())?,
        };
        self.clear();
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixed_clock() -> u64 {
        1_000
    }

    fn empty() -> CommentThread {
        CommentThread::with_clock(fixed_clock)
    }

    #[test]
    fn add_top_level_then_reply() {
        let mut thread = empty();
        let id = thread.add_top_level("Me", "hi").unwrap();
        assert_eq!(thread.len(), 1);
        assert_eq!(id, CommentId::new("1000"));

        let reply = thread.add_reply(&id, "Me", "ok").unwrap();
        assert_eq!(reply, CommentId::new("1001"));
        assert_eq!(thread.find(&id).unwrap().replies.len(), 1);
        assert_eq!(thread.find(&reply).unwrap().text, "ok");
    }

    #[test]
    fn top_level_comments_are_most_recent_first() {
        let mut thread = empty();
        let first = thread.add_top_level("Me", "first").unwrap();
        let second = thread.add_top_level("Me", "second").unwrap();
        assert_eq!(thread.comments()[0].id, second);
        assert_eq!(thread.comments()[1].id, first);
    }

    #[test]
    fn replies_keep_oldest_first_order() {
        let mut thread = CommentThread::seeded();
        let parent = CommentId::new("1");
        let reply = thread.add_reply(&parent, "Me", "late to the party").unwrap();
        let replies = &thread.find(&parent).unwrap().replies;
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].id, CommentId::new("1-1"));
        assert_eq!(replies[1].id, reply);
    }

    #[test]
    fn ids_are_strictly_increasing_with_a_frozen_clock() {
        let mut thread = empty();
        let a = thread.add_top_level("Me", "a").unwrap();
        let b = thread.add_top_level("Me", "b").unwrap();
        let a: u64 = a.as_str().parse().unwrap();
        let b: u64 = b.as_str().parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn reply_to_missing_parent_is_not_found() {
        let mut thread = CommentThread::seeded();
        let before = thread.clone();
        let missing = CommentId::new("nope");
        assert_eq!(
            thread.add_reply(&missing, "Me", "hello"),
            Err(CommentError::NotFound(missing))
        );
        assert_eq!(thread, before);
    }

    #[test]
    fn reply_to_nested_reply_is_supported_one_level_deep() {
        let mut thread = CommentThread::seeded();
        let nested = thread
            .add_reply(&CommentId::new("1-1"), "Me", "replying to Bob")
            .unwrap();
        assert_eq!(thread.find(&CommentId::new("1-1")).unwrap().replies.len(), 1);

        assert_eq!(
            thread.add_reply(&nested, "Me", "too deep"),
            Err(CommentError::TooDeep {
                id: nested,
                depth: 2
            })
        );
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut thread = empty();
        assert_eq!(thread.add_top_level("Me", "   "), Err(CommentError::EmptyText));
        assert!(thread.is_empty());
    }

    #[test]
    fn toggle_like_twice_restores_state() {
        let mut thread = CommentThread::seeded();
        let id = CommentId::new("2");
        thread.toggle_like(&id).unwrap();
        let liked = thread.find(&id).unwrap();
        assert!(liked.liked);
        assert_eq!(liked.like_count, 6);

        thread.toggle_like(&id).unwrap();
        let restored = thread.find(&id).unwrap();
        assert!(!restored.liked);
        assert_eq!(restored.like_count, 5);
    }

    #[test]
    fn toggle_like_on_nested_reply() {
        let mut thread = CommentThread::seeded();
        thread.toggle_like(&CommentId::new("1-1")).unwrap();
        assert_eq!(thread.find(&CommentId::new("1-1")).unwrap().like_count, 1);
        assert_eq!(
            thread.toggle_like(&CommentId::new("9")),
            Err(CommentError::NotFound(CommentId::new("9")))
        );
    }

    #[test]
    fn composer_posts_top_level_and_clears() {
        let mut thread = empty();
        let mut composer = CommentComposer::default();
        assert!(!composer.can_send());

        composer.set_draft("nice");
        assert!(composer.can_send());
        let id = composer.submit(&mut thread, LOCAL_AUTHOR).unwrap();

        assert_eq!(thread.comments()[0].id, id);
        assert_eq!(thread.comments()[0].author, "Me");
        assert_eq!(composer, CommentComposer::default());
    }

    #[test]
    fn composer_posts_reply_to_target() {
        let mut thread = CommentThread::seeded();
        let mut composer = CommentComposer::default();
        composer.reply_to(&thread, &CommentId::new("3")).unwrap();
        composer.set_draft("thanks");
        composer.submit(&mut thread, LOCAL_AUTHOR).unwrap();

        assert_eq!(thread.find(&CommentId::new("3")).unwrap().replies.len(), 1);
        assert!(composer.replying_to().is_none());
        assert_eq!(thread.len(), 4);
    }

    #[test]
    fn composer_keeps_draft_on_failure() {
        let mut thread = empty();
        let mut composer = CommentComposer::default();
        composer.set_draft("  ");
        assert_eq!(composer.submit(&mut thread, LOCAL_AUTHOR), Err(CommentError::EmptyText));
        assert_eq!(composer.draft(), "  ");
        assert!(composer.reply_to(&thread, &CommentId::new("x")).is_err());
    }

    proptest! {
        #[test]
        fn even_toggles_restore_like_count(base in 0u32..10_000, toggles in 0usize..50) {
            let mut comment = Comment::new(CommentId::new("c"), "A", "t").with_likes(base);
            for _ in 0..toggles {
                comment.toggle_like();
                prop_assert!(comment.like_count >= base);
            }
            if toggles % 2 == 0 {
                prop_assert_eq!(comment.like_count, base);
                prop_assert!(!comment.liked);
            } else {
                prop_assert_eq!(comment.like_count, base + 1);
                prop_assert!(comment.liked);
            }
        }

        #[test]
        fn replies_grow_parent_by_exactly_one(count in 1usize..20) {
            let mut thread = CommentThread::seeded();
            let parent = CommentId::new("2");
            for n in 0..count {
                thread.add_reply(&parent, "Me", format!("reply {n}")).unwrap();
                prop_assert_eq!(thread.find(&parent).unwrap().replies.len(), n + 1);
            }
        }
    }
}
