// furrow/src/core/context.rs

//! The `Handler<TData, Err>` type shared by flow steps and wizard transitions.

use crate::core::context_data::ContextData;
use crate::core::control::FlowControl;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by a [`Handler`].
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>>;

/// An async hook operating on a shared `ContextData<TData>`.
///
/// Handlers receive a clone of the context cell (cheap, it is an `Arc`).
/// Lock guards taken from it must be dropped before any `.await`.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;

/// Wraps a user closure whose error converts into `Err` as a boxed [`Handler`].
pub(crate) fn boxed_handler<TData, Err, F, UserErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: Send + 'static,
  F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
  UserErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx_data| {
    let user_fut = handler_fn(ctx_data);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}
