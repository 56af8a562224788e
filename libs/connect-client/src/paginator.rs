//! `NextToken` pagination as `Stream`s of pages or items.
//!
//! ```rust,ignore
//! use connect_client::model::ListQueuesRequest;
//! use futures_util::StreamExt;
//!
//! let input = ListQueuesRequest { instance_id: "inst-1".into(), ..Default::default() };
//! let mut queues = std::pin::pin!(client.items(input));
//! while let Some(queue) = queues.next().await {
//!     println!("{:?}", queue?.name);
//! }
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use pin_project_lite::pin_project;

use crate::error::ConnectError;
use crate::operation::Operation;

/// Output of a paginated operation.
pub trait Page {
    type Item;

    /// Token for the next page; `None` or empty on the last page.
    fn next_token(&self) -> Option<&str>;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Input of an operation whose output is a [`Page`].
pub trait Paginated: Operation<Output: Page> + Clone {
    fn next_token(&self) -> Option<&str>;

    fn set_next_token(&mut self, token: Option<String>);
}

/// Error type for pagination.
#[derive(Debug)]
pub enum PagerError {
    /// The page request failed.
    Fetch(ConnectError),
    /// The service returned the token it was just given.
    RepeatedToken(String),
}

impl fmt::Display for PagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "page fetch failed: {e}"),
            Self::RepeatedToken(token) => write!(f, "service repeated pagination token {token}"),
        }
    }
}

impl std::error::Error for PagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::RepeatedToken(_) => None,
        }
    }
}

impl From<ConnectError> for PagerError {
    fn from(err: ConnectError) -> Self {
        Self::Fetch(err)
    }
}

pin_project! {
    /// Stream of output pages.
    ///
    /// Stops after the page without a `NextToken`, or after yielding the
    /// first error.
    pub struct PagesPager<I, F, Fut>
    where
        I: Paginated,
        F: FnMut(I) -> Fut,
        Fut: Future<Output = Result<I::Output, ConnectError>>,
    {
        request: I,
        sent_token: Option<String>,
        next_token: Option<String>,
        started: bool,
        done: bool,
        fetcher: F,
        #[pin]
        current_fetch: Option<Fut>,
    }
}

impl<I, F, Fut> PagesPager<I, F, Fut>
where
    I: Paginated,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<I::Output, ConnectError>>,
{
    /// `request` is the first page's input; its own token, if any, is the
    /// starting point.
    pub fn new(request: I, fetcher: F) -> Self {
        let sent_token = request
            .next_token()
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        Self {
            request,
            sent_token,
            next_token: None,
            started: false,
            done: false,
            fetcher,
            current_fetch: None,
        }
    }
}

impl<I, F, Fut> Stream for PagesPager<I, F, Fut>
where
    I: Paginated,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<I::Output, ConnectError>>,
{
    type Item = Result<I::Output, PagerError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }

            if let Some(fut) = this.current_fetch.as_mut().as_pin_mut() {
                match fut.poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.current_fetch.set(None);
                        *this.next_token = page
                            .next_token()
                            .filter(|token| !token.is_empty())
                            .map(str::to_owned);
                        if this.next_token.is_none() {
                            *this.done = true;
                        }
                        return Poll::Ready(Some(Ok(page)));
                    }
                    Poll::Ready(Err(e)) => {
                        this.current_fetch.set(None);
                        *this.done = true;
                        return Poll::Ready(Some(Err(PagerError::Fetch(e))));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            let mut request = this.request.clone();
            if *this.started {
                if this.next_token == this.sent_token {
                    *this.done = true;
                    let token = this.next_token.take().unwrap_or_default();
                    return Poll::Ready(Some(Err(PagerError::RepeatedToken(token))));
                }
                request.set_next_token(this.next_token.clone());
                this.sent_token.clone_from(this.next_token);
            }
            *this.started = true;

            // Polled on the next loop turn so the future registers the waker.
            let fut = (this.fetcher)(request);
            this.current_fetch.set(Some(fut));
        }
    }
}

pin_project! {
    /// Stream of individual items across pages.
    pub struct ItemsPager<I, F, Fut>
    where
        I: Paginated,
        F: FnMut(I) -> Fut,
        Fut: Future<Output = Result<I::Output, ConnectError>>,
    {
        #[pin]
        pages: PagesPager<I, F, Fut>,
        buffer: VecDeque<<I::Output as Page>::Item>,
    }
}

impl<I, F, Fut> ItemsPager<I, F, Fut>
where
    I: Paginated,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<I::Output, ConnectError>>,
{
    pub fn new(request: I, fetcher: F) -> Self {
        Self {
            pages: PagesPager::new(request, fetcher),
            buffer: VecDeque::new(),
        }
    }
}

impl<I, F, Fut> Stream for ItemsPager<I, F, Fut>
where
    I: Paginated,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<I::Output, ConnectError>>,
{
    type Item = Result<<I::Output as Page>::Item, PagerError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(item) = this.buffer.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            match this.pages.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(page))) => this.buffer.extend(page.into_items()),
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
