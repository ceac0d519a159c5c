//! Twitter/X high/low traction partitioning (spec.md §4.3).

/// The engagement signals the score formula reads. Weights
/// `(1, 2, 1.5, 3)` are load-bearing (spec.md §9): changing them changes
/// reasoning outputs downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TweetMetrics {
    pub likes: f64,
    pub retweets: f64,
    pub replies: f64,
    pub bookmarks: f64,
    pub views: f64,
}

impl TweetMetrics {
    /// `(likes + 2*retweets + 1.5*replies + 3*bookmarks) / max(views, 1)`.
    #[must_use]
    pub fn score(&self) -> f64 {
        let numerator = self.likes + 2.0 * self.retweets + 1.5 * self.replies + 3.0 * self.bookmarks;
        numerator / self.views.max(1.0)
    }
}

/// The floor below which forensics must return empty rather than classify
/// (spec.md §4.3, §8).
pub const MIN_TWEETS_TO_CLASSIFY: usize = 4;

/// Partition `items` into `(high, low)` cohorts by engagement score.
///
/// Returns `None` when `items.len() < 4` — below that floor the caller must
/// treat forensics as empty, not attempt to classify (spec.md §4.3).
pub fn classify_by_engagement<T: Clone>(
    items: &[T],
    metrics: impl Fn(&T) -> TweetMetrics,
) -> Option<(Vec<T>, Vec<T>)> {
    if items.len() < MIN_TWEETS_TO_CLASSIFY {
        return None;
    }

    let mut scored: Vec<(f64, &T)> = items.iter().map(|t| (metrics(t).score(), t)).collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let n = scored.len();
    let cut = n.div_ceil(4);

    let high: Vec<T> = scored[..cut].iter().map(|(_, t)| (*t).clone()).collect();
    let low: Vec<T> = scored[n - cut..].iter().map(|(_, t)| (*t).clone()).collect();

    Some((high, low))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tweet {
        id: u32,
        metrics: TweetMetrics,
    }

    fn tweet(id: u32, likes: f64, retweets: f64, replies: f64, bookmarks: f64, views: f64) -> Tweet {
        Tweet {
            id,
            metrics: TweetMetrics {
                likes,
                retweets,
                replies,
                bookmarks,
                views,
            },
        }
    }

    #[test]
    fn below_floor_returns_none() {
        let tweets = vec![
            tweet(1, 10.0, 0.0, 0.0, 0.0, 100.0),
            tweet(2, 20.0, 0.0, 0.0, 0.0, 100.0),
            tweet(3, 5.0, 0.0, 0.0, 0.0, 100.0),
        ];
        assert!(classify_by_engagement(&tweets, |t| t.metrics).is_none());
    }

    #[test]
    fn at_floor_classifies() {
        let tweets = vec![
            tweet(1, 100.0, 10.0, 5.0, 2.0, 1000.0),
            tweet(2, 1.0, 0.0, 0.0, 0.0, 1000.0),
            tweet(3, 50.0, 5.0, 2.0, 1.0, 1000.0),
            tweet(4, 0.0, 0.0, 0.0, 0.0, 1000.0),
        ];
        let (high, low) = classify_by_engagement(&tweets, |t| t.metrics).unwrap();
        assert_eq!(high.len(), 1);
        assert_eq!(low.len(), 1);
        assert_eq!(high[0].id, 1);
        assert_eq!(low[0].id, 4);
    }

    #[test]
    fn score_weights_bookmarks_highest() {
        let save_heavy = TweetMetrics {
            likes: 0.0,
            retweets: 0.0,
            replies: 0.0,
            bookmarks: 10.0,
            views: 100.0,
        };
        let like_heavy = TweetMetrics {
            likes: 20.0,
            retweets: 0.0,
            replies: 0.0,
            bookmarks: 0.0,
            views: 100.0,
        };
        assert!(save_heavy.score() > like_heavy.score());
    }

    #[test]
    fn zero_views_does_not_divide_by_zero() {
        let m = TweetMetrics {
            likes: 10.0,
            retweets: 0.0,
            replies: 0.0,
            bookmarks: 0.0,
            views: 0.0,
        };
        assert_eq!(m.score(), 10.0);
    }

    #[test]
    fn cohorts_never_exceed_input_and_stay_subsets() {
        let tweets: Vec<Tweet> = (1..=12)
            .map(|i| tweet(i, i as f64, 0.0, 0.0, 0.0, 100.0))
            .collect();
        let (high, low) = classify_by_engagement(&tweets, |t| t.metrics).unwrap();
        assert!(high.len() <= tweets.len());
        assert!(low.len() <= tweets.len());
        for h in &high {
            assert!(tweets.contains(h));
        }
    }
}
