//! The handler contract.
//!
//! A handler is any async function or closure whose arguments were
//! produced by extraction and whose return value renders as the response.
//! [`Handler`] flattens the arguments into one tuple so the pipeline can
//! stay generic over arity; implementations cover arities zero to four.

/// An async request handler taking its arguments as one tuple.
#[expect(
    async_fn_in_trait,
    reason = "handler futures are driven on one thread and promise no auto traits"
)]
pub trait Handler<Args> {
    /// What the handler produces; the pipeline requires it to implement
    /// [`crate::respond::Respond`].
    type Response;

    async fn call(&self, args: Args) -> Self::Response;
}

impl<Func, Ret> Handler<()> for Func
where
    Func: AsyncFn() -> Ret,
{
    type Response = Ret;

    async fn call(&self, args: ()) -> Ret {
        let () = args;
        (self)().await
    }
}

macro_rules! impl_handler_for_async_fn {
    ($($arg:ident)+) => {
        impl<Func, Ret, $($arg),+> Handler<($($arg,)+)> for Func
        where
            Func: AsyncFn($($arg),+) -> Ret,
        {
            type Response = Ret;

            #[expect(non_snake_case, reason = "tuple members reuse their type parameter names")]
            async fn call(&self, ($($arg,)+): ($($arg,)+)) -> Ret {
                (self)($($arg),+).await
            }
        }
    };
}

impl_handler_for_async_fn! { A }
impl_handler_for_async_fn! { A B }
impl_handler_for_async_fn! { A B C }
impl_handler_for_async_fn! { A B C D }

#[cfg(test)]
mod tests {
    use nano_http::task::block_on;

    use super::*;

    async fn nullary() -> u8 {
        7
    }

    async fn add(left: u8, right: u8) -> u8 {
        left + right
    }

    async fn concat(a: &'static str, b: &'static str, c: &'static str, d: &'static str) -> String {
        format!("{a}{b}{c}{d}")
    }

    #[test]
    fn nullary_handlers_run() {
        assert_eq!(block_on(nullary.call(())), 7);
    }

    #[test]
    fn arguments_arrive_in_tuple_order() {
        assert_eq!(block_on(add.call((3, 4))), 7);
        assert_eq!(block_on(concat.call(("a", "b", "c", "d"))), "abcd");
    }

    #[test]
    fn closures_are_handlers_too() {
        let doubled = async |value: u8| value * 2;
        assert_eq!(block_on(doubled.call((5,))), 10);
    }
}
