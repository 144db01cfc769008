/// Generate page client methods with oneshot channel boilerplate and automatic tracing.
///
/// Each generated method sends one UI event to the page service and waits for
/// its reply. Channel failures map to [`PageError`](crate::error::PageError).
macro_rules! page_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[tracing::instrument(skip_all)]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $crate::error::PageError> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| $crate::error::PageError::Closed)?;

                response.await.map_err(|_| $crate::error::PageError::Dropped)
            }
        }
    };
}

/// Shutdown method shared by every page client. Fire-and-forget, no reply.
macro_rules! page_shutdown {
    ($client:ty, $request:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn shutdown(&self) -> Result<(), $crate::error::PageError> {
                tracing::debug!("Sending shutdown request");
                self.sender
                    .send($request::Shutdown)
                    .await
                    .map_err(|_| $crate::error::PageError::Closed)
            }
        }
    };
}
