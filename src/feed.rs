use crate::types::{ActivityItem, ActivityKind, Page, PER_PAGE, Post, SharedPost};

/// Tags and concatenates a user's (or user set's) original posts and
/// reshares, newest first. The sort is stable so equal timestamps keep
/// their fetch order (posts before shares).
pub fn merge_activity(posts: &[Post], shares: &[SharedPost]) -> Vec<ActivityItem> {
    let mut items: Vec<ActivityItem> = posts
        .iter()
        .map(ActivityItem::from_post)
        .chain(shares.iter().map(ActivityItem::from_shared_post))
        .collect();

    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

/// Following-feed rule: when an original post and a reshare of that same
/// post both land in the merged sequence, the reshare is redundant. For
/// each post item the first matching reshare is removed. This only looks
/// at the in-memory sequence of the current computation.
pub fn dedup_reshares(items: &mut Vec<ActivityItem>) {
    let post_ids: Vec<i64> = items
        .iter()
        .filter(|item| item.kind == ActivityKind::Post)
        .map(|item| item.post_id)
        .collect();

    for post_id in post_ids {
        if let Some(pos) = items
            .iter()
            .position(|item| item.kind == ActivityKind::SharedPost && item.post_id == post_id)
        {
            items.remove(pos);
        }
    }
}

/// In-memory slice of an already sorted feed. 1-based page number, fixed
/// page size of 15. The offset is widened past u32 so an absurd page
/// number lands past the end instead of wrapping.
pub fn paginate(items: Vec<ActivityItem>, page: u32) -> Page<ActivityItem> {
    let page = page.max(1);
    let total = items.len() as u64;
    let offset = (page as u64 - 1) * PER_PAGE as u64;

    let page_items = items
        .into_iter()
        .skip(offset as usize)
        .take(PER_PAGE as usize)
        .collect();

    Page::new(page_items, total, page)
}

/// Profile feed: the subject's own posts and reshares, duplicates kept.
/// `None` when the subject has no activity at all.
pub fn profile_activity(
    posts: &[Post],
    shares: &[SharedPost],
    page: u32,
) -> Option<Page<ActivityItem>> {
    if posts.is_empty() && shares.is_empty() {
        return None;
    }
    Some(paginate(merge_activity(posts, shares), page))
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn post(id: i64, author_id: i64, at: i64) -> Post {
        let ts = OffsetDateTime::from_unix_timestamp(at).unwrap();
        Post {
            id,
            title: format!("post {id}"),
            slug: format!("post-{id}"),
            author_id,
            image: None,
            blur_hash: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn share(id: i64, user_id: i64, post_id: i64, at: i64) -> SharedPost {
        SharedPost {
            id,
            user_id,
            post_id,
            created_at: OffsetDateTime::from_unix_timestamp(at).unwrap(),
        }
    }

    #[test]
    fn merge_sorts_newest_first() {
        let items = merge_activity(&[post(1, 10, 10)], &[share(1, 11, 2, 20)]);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ActivityKind::SharedPost);
        assert_eq!(items[1].kind, ActivityKind::Post);
    }

    #[test]
    fn merge_keeps_insertion_order_on_ties() {
        let items = merge_activity(&[post(1, 10, 50), post(2, 10, 50)], &[share(1, 11, 3, 50)]);

        let ids: Vec<(ActivityKind, i64)> = items.iter().map(|i| (i.kind, i.id)).collect();
        assert_eq!(
            ids,
            vec![
                (ActivityKind::Post, 1),
                (ActivityKind::Post, 2),
                (ActivityKind::SharedPost, 1),
            ]
        );
    }

    #[test]
    fn no_dedup_for_distinct_posts() {
        let mut items = merge_activity(&[post(1, 10, 10)], &[share(1, 11, 2, 20)]);
        dedup_reshares(&mut items);

        assert_eq!(items.len(), 2);
    }

    #[test]
    fn reshare_of_present_post_is_removed() {
        // post 1 authored by user A, reshared later by user B
        let mut items = merge_activity(&[post(1, 10, 10)], &[share(7, 11, 1, 20)]);
        assert_eq!(items[0].kind, ActivityKind::SharedPost);

        dedup_reshares(&mut items);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ActivityKind::Post);
        assert_eq!(items[0].post_id, 1);
    }

    #[test]
    fn dedup_removes_one_reshare_per_post() {
        let mut items = merge_activity(
            &[post(1, 10, 10)],
            &[share(7, 11, 1, 20), share(8, 12, 1, 30)],
        );
        dedup_reshares(&mut items);

        // first matching reshare in sort order goes, the other survives
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 7);
        assert_eq!(items[0].kind, ActivityKind::SharedPost);
        assert_eq!(items[1].kind, ActivityKind::Post);
    }

    #[test]
    fn pagination_splits_at_fifteen() {
        let posts: Vec<Post> = (1..=20).map(|i| post(i, 10, 100 - i)).collect();
        let items = merge_activity(&posts, &[]);

        let first = paginate(items.clone(), 1);
        assert_eq!(first.items.len(), 15);
        assert_eq!(first.total, 20);
        assert_eq!(first.per_page, 15);
        assert_eq!(first.current_page, 1);
        assert_eq!(first.last_page, 2);
        assert_eq!(first.items[0].id, 1);

        let second = paginate(items, 2);
        assert_eq!(second.items.len(), 5);
        assert_eq!(second.total, 20);
        assert_eq!(second.items[0].id, 16);
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_totals() {
        let items = merge_activity(&[post(1, 10, 10)], &[]);
        let page = paginate(items, 3);

        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn maximum_page_number_is_an_empty_page() {
        let items = merge_activity(&[post(1, 10, 10)], &[]);
        let page = paginate(items, u32::MAX);

        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
        assert_eq!(page.current_page, u32::MAX);
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn user_without_posts_or_shares_has_no_activity() {
        assert!(profile_activity(&[], &[], 1).is_none());
    }

    #[test]
    fn profile_activity_keeps_reshares_of_own_posts() {
        let page = profile_activity(&[post(1, 10, 10)], &[share(7, 10, 1, 20)], 1).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn empty_feed_paginates_to_empty_page_one() {
        let page = paginate(Vec::new(), 1);

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.last_page, 1);
    }
}
