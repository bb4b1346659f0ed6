//! Last-resort containment for the section tree.
//!
//! `view` takes `&self`, so the tripped flag lives in a `RefCell`. Once
//! tripped the boundary keeps rendering the fallback for the rest of the
//! session; it does not try to recover.

use std::any::Any;
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::RenderError;

pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again later.";

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    tripped: RefCell<Option<RenderError>>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.borrow().is_some()
    }

    /// Builds the guarded subtree, or the fallback when building it returns
    /// a `RenderError` or panics.
    pub fn guard<T>(
        &self,
        build: impl FnOnce() -> Result<T, RenderError>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.is_tripped() {
            return fallback();
        }

        let error = match catch_unwind(AssertUnwindSafe(build)) {
            Ok(Ok(tree)) => return tree,
            Ok(Err(error)) => error,
            Err(payload) => RenderError::Panicked(panic_message(payload.as_ref())),
        };

        tracing::error!(error = %error, "render failure caught by error boundary");
        *self.tripped.borrow_mut() = Some(error);
        fallback()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        String::from(*message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_build_passes_through() {
        let boundary = ErrorBoundary::new();

        let tree = boundary.guard(|| Ok("sections"), || "fallback");

        assert_eq!(tree, "sections");
        assert!(!boundary.is_tripped());
    }

    #[test]
    fn test_render_error_swaps_in_fallback() {
        // Arrange
        let boundary = ErrorBoundary::new();

        // Act
        let tree = boundary.guard(
            || Err::<&str, _>(RenderError::MissingSection(String::from("Trending Movies"))),
            || FALLBACK_MESSAGE,
        );

        // Assert
        assert_eq!(tree, FALLBACK_MESSAGE);
        assert_eq!(
            boundary.tripped.borrow().clone(),
            Some(RenderError::MissingSection(String::from("Trending Movies")))
        );
    }

    #[test]
    fn test_panic_is_caught_and_recorded() {
        // Arrange
        let boundary = ErrorBoundary::new();

        // Act
        let tree = boundary.guard(
            || -> Result<&str, RenderError> { panic!("index out of bounds") },
            || FALLBACK_MESSAGE,
        );

        // Assert
        assert_eq!(tree, FALLBACK_MESSAGE);
        assert_eq!(
            boundary.tripped.borrow().clone(),
            Some(RenderError::Panicked(String::from("index out of bounds")))
        );
    }

    #[test]
    fn test_tripped_boundary_stays_on_fallback() {
        // Arrange
        let boundary = ErrorBoundary::new();
        boundary.guard(
            || Err::<&str, _>(RenderError::Panicked(String::from("x"))),
            || "fallback",
        );

        // Act
        let tree = boundary.guard(|| Ok("sections"), || "fallback");

        // Assert
        assert_eq!(tree, "fallback");
    }
}
