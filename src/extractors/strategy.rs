// src/extractors/strategy.rs

/// One named step of an ordered fallback chain.
pub struct Strategy<I: ?Sized, O> {
    pub name: &'static str,
    pub run: fn(&I) -> Option<O>,
}

impl<I: ?Sized, O> Strategy<I, O> {
    pub fn new(name: &'static str, run: fn(&I) -> Option<O>) -> Self {
        Self { name, run }
    }
}

/// Runs `strategies` in order and returns the first result that is `Some`.
///
/// Misses are ordinary control flow: they are traced and the next strategy is
/// tried. `goal` only labels the log lines.
pub fn first_success<I: ?Sized, O>(goal: &str, input: &I, strategies: &[Strategy<I, O>]) -> Option<O> {
    for strategy in strategies {
        match (strategy.run)(input) {
            Some(found) => {
                tracing::debug!("{}: resolved by strategy '{}'", goal, strategy.name);
                return Some(found);
            }
            None => tracing::trace!("{}: strategy '{}' found nothing", goal, strategy.name),
        }
    }
    tracing::debug!("{}: no strategy succeeded", goal);
    None
}

/// Adapts a collection-producing step so that an empty result counts as a miss.
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &str) -> Option<usize> {
        None
    }

    fn length(input: &str) -> Option<usize> {
        Some(input.len())
    }

    fn always_one(_: &str) -> Option<usize> {
        Some(1)
    }

    #[test]
    fn earliest_success_wins() {
        let chain = [
            Strategy::new("never", never),
            Strategy::new("length", length),
            Strategy::new("one", always_one),
        ];
        assert_eq!(first_success("test", "abcd", &chain), Some(4));
    }

    #[test]
    fn all_misses_yield_none() {
        let chain = [Strategy::new("never", never), Strategy::new("never-again", never)];
        assert_eq!(first_success("test", "abcd", &chain), None);
    }

    #[test]
    fn empty_collections_are_misses() {
        assert_eq!(non_empty(Vec::<u8>::new()), None);
        assert_eq!(non_empty(vec![1]), Some(vec![1]));
    }
}
