use crate::error::ExtractionError;
use log::warn;
use std::future::Future;
use std::time::Duration;

/// Race `future` against a timer.
///
/// When the timer wins the future is dropped, so whatever it would have
/// produced is discarded, and a `Timeout` error carrying `message` is returned.
pub async fn with_deadline<T, Fut>(
    limit: Duration,
    message: impl Into<String>,
    future: Fut,
) -> Result<T, ExtractionError>
where
    Fut: Future<Output = Result<T, ExtractionError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => {
            let message = message.into();
            warn!("Deadline of {:?} exceeded: {}", limit, message);
            Err(ExtractionError::timeout(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_fires() {
        let result: Result<(), _> = with_deadline(
            Duration::from_secs(5),
            "Page fetch timed out",
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.message, "Page fetch timed out");
    }

    #[tokio::test(start_paused = true)]
    async fn test_value_within_deadline() {
        let result = with_deadline(Duration::from_secs(5), "unused", async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<_, ExtractionError>(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<(), _> = with_deadline(Duration::from_secs(5), "unused", async {
            Err(ExtractionError::no_recipe("nothing here"))
        })
        .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::NoRecipeFound);
    }
}
