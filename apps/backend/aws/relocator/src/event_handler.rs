use aws_lambda_events::s3::{S3Event, S3EventRecord};
use aws_lambda_events::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent, SqsMessage};
use lambda_runtime::{Error, LambdaEvent, tracing};
use whisker_core::{CatImageRelocator, ImageReference, RelocationOutcome};

/// How notifications reach the function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Direct S3 bucket notification
    S3,
    /// S3 notification delivered through an SQS queue
    Sqs,
}

impl EventSource {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("RELOCATOR_EVENT_SOURCE").unwrap_or_default())
    }

    fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sqs" => Self::Sqs,
            "s3" | "" => Self::S3,
            other => {
                tracing::warn!(value = other, "Unknown RELOCATOR_EVENT_SOURCE, using s3");
                Self::S3
            }
        }
    }
}

/// S3 notifications form-encode object keys (`+` for space, `%XX` escapes)
fn decode_key(key: &str) -> String {
    let plus_decoded = key.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => plus_decoded,
    }
}

fn image_reference(record: &S3EventRecord) -> Option<ImageReference> {
    let bucket = record.s3.bucket.name.clone()?;
    let key = record.s3.object.key.as_deref()?;

    Some(ImageReference {
        bucket,
        key: decode_key(key),
        version_id: record.s3.object.version_id.clone(),
    })
}

/// Relocate every record in order and return how many failed
async fn relocate_records(relocator: &CatImageRelocator, records: &[S3EventRecord]) -> usize {
    let references: Vec<ImageReference> = records
        .iter()
        .filter_map(|record| {
            let reference = image_reference(record);
            if reference.is_none() {
                tracing::warn!(event_name = ?record.event_name, "Record without bucket or key, skipping");
            }
            reference
        })
        .collect();

    let mut failed = 0;
    for (reference, result) in references
        .iter()
        .zip(relocator.relocate_batch(&references).await)
    {
        match result {
            Ok(RelocationOutcome::Copied {
                destination_key, ..
            }) => {
                tracing::info!(key = %reference.key, destination_key = %destination_key, "Relocated");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(bucket = %reference.bucket, key = %reference.key, error = %e, "Failed to relocate image");
                failed += 1;
            }
        }
    }
    failed
}

pub async fn s3_handler(
    event: LambdaEvent<S3Event>,
    relocator: &CatImageRelocator,
) -> Result<(), Error> {
    let records = &event.payload.records;
    let failed = relocate_records(relocator, records).await;

    if failed > 0 {
        return Err(Error::from(format!(
            "{} of {} records failed to relocate",
            failed,
            records.len()
        )));
    }

    Ok(())
}

/// Parse the S3 notification carried in an SQS message body.
///
/// `Ok(None)` for the `s3:TestEvent` S3 sends when a notification is configured.
fn parse_notification(body: &str) -> Result<Option<S3Event>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("Event").and_then(|e| e.as_str()) == Some("s3:TestEvent") {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}

async fn process_message(relocator: &CatImageRelocator, message: &SqsMessage) -> bool {
    let body = message.body.as_deref().unwrap_or_default();
    match parse_notification(body) {
        Ok(Some(event)) => relocate_records(relocator, &event.records).await == 0,
        Ok(None) => true,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse S3 notification");
            false
        }
    }
}

async fn process_messages(
    relocator: &CatImageRelocator,
    messages: &[SqsMessage],
) -> SqsBatchResponse {
    let mut batch_item_failures = Vec::new();

    for message in messages {
        if process_message(relocator, message).await {
            continue;
        }
        match &message.message_id {
            Some(message_id) => batch_item_failures.push(BatchItemFailure {
                item_identifier: message_id.clone(),
            }),
            None => tracing::warn!("Failed message has no message id, cannot report it"),
        }
    }

    SqsBatchResponse {
        batch_item_failures,
    }
}

pub async fn sqs_handler(
    event: LambdaEvent<SqsEvent>,
    relocator: &CatImageRelocator,
) -> Result<SqsBatchResponse, Error> {
    Ok(process_messages(relocator, &event.payload.records).await)
}
