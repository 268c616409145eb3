//! Declarative macros for ergonomic effect construction
//!
//! API calls inside reducers are almost always "run this async block and feed
//! the resulting action back", which [`async_effect!`] writes in one line.

/// Create an `Effect::Future` from an async block
///
/// The block must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use faraway_admin_core::async_effect;
///
/// let client = env.client.clone();
/// async_effect! {
///     match client.send(request).await {
///         Ok(body) => Some(BlogAction::Loaded { body }),
///         Err(error) => Some(BlogAction::Failed { message: error.to_string() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Fetched { page: u32 },
    }

    #[tokio::test]
    async fn test_async_effect_macro() {
        let page = 2;
        let effect = async_effect! {
            Some(TestAction::Fetched { page })
        };

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! must build a future effect");
        };
        assert_eq!(fut.await, Some(TestAction::Fetched { page: 2 }));
    }

    #[tokio::test]
    async fn test_async_effect_macro_may_produce_nothing() {
        let effect: Effect<TestAction> = async_effect! { None };
        assert!(!effect.is_none());

        let Effect::Future(fut) = effect else {
            unreachable!("async_effect! must build a future effect");
        };
        assert_eq!(fut.await, None);
    }
}
