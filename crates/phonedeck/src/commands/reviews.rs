//! Review command handlers.

use tabled::Tabled;

use phonedeck_core::{Catalog, Review, ReviewDraft};

use crate::cli::{GlobalOpts, ReviewFieldArgs, ReviewsArgs, ReviewsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReviewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Reviewer")]
    reviewer: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Comment")]
    comment: String,
    #[tabled(rename = "Date")]
    date: String,
}

fn to_row(r: &Review, color: bool) -> ReviewRow {
    ReviewRow {
        id: r.id.to_string(),
        reviewer: if r.reviewer.is_empty() {
            "anonymous".into()
        } else {
            r.reviewer.clone()
        },
        rating: output::stars(r.rating, color),
        comment: r.comment.clone(),
        date: r
            .created_at
            .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d").to_string()),
    }
}

fn to_draft(fields: ReviewFieldArgs) -> ReviewDraft {
    ReviewDraft {
        reviewer: fields.reviewer,
        rating: fields.rating,
        comment: fields.comment,
    }
}

/// Mean star rating, ignoring unrated reviews.
fn average(reviews: &[Review]) -> Option<f64> {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter_map(|r| r.rating)
        .map(f64::from)
        .collect();
    if ratings.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    let count = ratings.len() as f64;
    Some(ratings.iter().sum::<f64>() / count)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(catalog: &Catalog, args: ReviewsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ReviewsCommand::List { device } => {
            let id = util::record_id(&device, "device")?;
            util::connect(catalog).await?;
            let found = util::resolve_device(catalog, &id)?;
            let reviews = catalog.reviews_for(&id).await?;

            if reviews.is_empty() && output::is_human(&global.output) {
                output::print_status(
                    &format!("No reviews yet for {}", found.display_name()),
                    global.quiet,
                );
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                reviews.as_slice(),
                |r| to_row(r, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            if output::is_human(&global.output) {
                let summary = match average(&reviews) {
                    Some(avg) => format!("{} reviews, average {avg:.1} stars", reviews.len()),
                    None => format!("{} reviews", reviews.len()),
                };
                output::print_status(&summary, global.quiet);
            }
            Ok(())
        }

        ReviewsCommand::Add { device, review } => {
            let id = util::record_id(&device, "device")?;
            let draft = to_draft(review);
            draft.validate()?;
            util::connect(catalog).await?;
            let found = util::resolve_device(catalog, &id)?;

            let added = catalog.add_review(&id, draft).await?;
            let out = output::render_single(
                &global.output,
                &added,
                |r| format!("Review {} added", r.id),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            output::print_status(
                &output::accent(&format!("Reviewed {}", found.display_name()), true, color),
                global.quiet,
            );
            Ok(())
        }

        ReviewsCommand::Update {
            device,
            review,
            fields,
        } => {
            let device_id = util::record_id(&device, "device")?;
            let review_id = util::record_id(&review, "review")?;
            let draft = to_draft(fields);
            draft.validate()?;
            util::connect(catalog).await?;

            // Prime the cache so the review's device and date are known.
            catalog.reviews_for(&device_id).await?;
            let updated = catalog.update_review(&review_id, draft).await?;
            let out = output::render_single(
                &global.output,
                &updated,
                |r| format!("Review {} updated", r.id),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReviewsCommand::Remove { review } => {
            let id = util::record_id(&review, "review")?;
            util::connect(catalog).await?;
            if !util::confirm(&format!("Delete review {id}?"), "reviews remove", global.yes)? {
                return Ok(());
            }
            catalog.remove_review(&id).await?;
            output::print_status("Review removed", global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, rating: Option<u8>) -> Review {
        Review {
            id: id.into(),
            mobile_id: "1".into(),
            reviewer: String::new(),
            rating,
            comment: "ok".into(),
            created_at: None,
        }
    }

    #[test]
    fn average_skips_unrated_reviews() {
        let reviews = vec![review("r1", Some(4)), review("r2", None), review("r3", Some(5))];
        let avg = average(&reviews).unwrap_or_default();
        assert!((avg - 4.5).abs() < f64::EPSILON);
        assert_eq!(average(&[review("r4", None)]), None);
    }

    #[test]
    fn anonymous_reviewer_is_labelled() {
        let row = to_row(&review("r1", Some(3)), false);
        assert_eq!(row.reviewer, "anonymous");
        assert_eq!(row.rating, "★★★☆☆");
    }
}
