diesel::table! {
    feeds (id) {
        id -> Integer,
        url -> Text,
        title -> Text,
        created_at -> BigInt,
    }
}

diesel::table! {
    links (id) {
        id -> Integer,
        source_id -> Integer,
        target_id -> Integer,
        context -> Text,
        post_url -> Text,
        post_title -> Text,
        discovered_at -> BigInt,
    }
}

diesel::table! {
    mentions (id) {
        id -> Integer,
        source_id -> Integer,
        name -> Text,
        entity_type -> Text,
        context -> Text,
        post_url -> Text,
        post_title -> Text,
        discovered_at -> BigInt,
    }
}

diesel::table! {
    mention_snapshots (id) {
        id -> Integer,
        name -> Text,
        entity_type -> Text,
        mention_count -> BigInt,
        snapshot_date -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(feeds, links, mentions, mention_snapshots);
