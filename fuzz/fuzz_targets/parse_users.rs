#![no_main]

use cohort_core::build::{build_follow_graph, count_friends};
use cohort_core::records::parse_users;
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must either fail to parse or yield a graph whose user
// ids are all nodes.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(users) = parse_users(text) else {
        return;
    };
    let counts = count_friends(&users);
    let graph = build_follow_graph(&users, &counts, 1);
    for user in &users {
        assert!(graph.contains_node(&user.id));
    }
});
