//! Integration tests for the poll service on an on-disk store.

use pollme_polls::{
    ChoiceInput, Error, NewGenre, NewPoll, NewSampleNode, PollQuery, PollService, PollView,
    SampleData, StoreConfig,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> PollService {
    PollService::open(StoreConfig::new(dir.path().join("polls"))).unwrap()
}

fn create(service: &PollService, owner: &str, text: &str) -> u64 {
    service
        .create_poll(
            owner,
            NewPoll {
                text: text.to_string(),
                choice1: "Yes".to_string(),
                choice2: "No".to_string(),
            },
        )
        .unwrap()
        .id
}

fn texts(service: &PollService, query: &PollQuery) -> Vec<String> {
    service
        .list_polls(query)
        .unwrap()
        .items
        .into_iter()
        .map(|s| s.poll.text)
        .collect()
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let poll_id = {
        let service = open(&dir);
        let id = create(&service, "alice", "Persistent?");
        service.store().flush().unwrap();
        id
    };

    let service = open(&dir);
    match service.poll_detail(poll_id).unwrap() {
        PollView::Ballot { poll, choices } => {
            assert_eq!(poll.text, "Persistent?");
            assert_eq!(choices.len(), 2);
        }
        PollView::Results(_) => panic!("poll should still be open"),
    }
}

#[test]
fn test_search_and_sort() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    let cats = create(&service, "alice", "Cats or dogs?");
    create(&service, "bob", "Best CAT food?");
    create(&service, "bob", "Anything else?");

    let yes = service.store().choices_for_poll(cats).unwrap()[0].id;
    service.vote("carol", cats, Some(yes)).unwrap();
    service.vote("dave", cats, Some(yes)).unwrap();

    let query = PollQuery {
        search: Some("cat".to_string()),
        ..Default::default()
    };
    assert_eq!(texts(&service, &query), vec!["Cats or dogs?", "Best CAT food?"]);

    let query = PollQuery {
        name: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(
        texts(&service, &query),
        vec!["Anything else?", "Best CAT food?", "Cats or dogs?"]
    );

    let query = PollQuery {
        name: Some(String::new()),
        vote: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(texts(&service, &query).last().unwrap(), "Cats or dogs?");
}

#[test]
fn test_pagination() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    for i in 0..8 {
        create(&service, "alice", &format!("Poll {i}"));
    }
    create(&service, "bob", "Bob's poll");

    let page = service.list_polls(&PollQuery::default()).unwrap();
    assert_eq!(page.items.len(), 6);
    assert_eq!(page.num_pages, 2);

    let query = PollQuery {
        page: Some("2".to_string()),
        ..Default::default()
    };
    assert_eq!(service.list_polls(&query).unwrap().items.len(), 3);

    let mine = service.list_by_user("alice", Some("9")).unwrap();
    assert_eq!(mine.count, 8);
    assert_eq!(mine.number, 2);
    assert_eq!(mine.items.len(), 1);

    let none = service.list_by_user("nobody", None).unwrap();
    assert!(none.items.is_empty());
    assert_eq!(none.num_pages, 1);
}

#[test]
fn test_choice_lifecycle() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    let poll_id = create(&service, "alice", "Lunch?");

    let soup = service
        .add_choice(
            "alice",
            poll_id,
            ChoiceInput {
                choice_text: "Soup".to_string(),
            },
        )
        .unwrap();
    service.vote("bob", poll_id, Some(soup.id)).unwrap();

    let err = service
        .edit_choice(
            "bob",
            soup.id,
            ChoiceInput {
                choice_text: "Stew".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotOwner { .. }));

    let stew = service
        .edit_choice(
            "alice",
            soup.id,
            ChoiceInput {
                choice_text: "Stew".to_string(),
            },
        )
        .unwrap();
    assert_eq!(stew.choice_text, "Stew");

    service.delete_choice("alice", soup.id).unwrap();
    let results = service.results(poll_id).unwrap();
    assert_eq!(results.choices.len(), 2);
    assert_eq!(results.total_votes, 0);
    assert!(service.user_can_vote("bob", poll_id).unwrap());

    assert!(matches!(
        service.delete_choice("alice", soup.id).unwrap_err(),
        Error::ChoiceNotFound(_)
    ));
}

#[test]
fn test_vote_and_end() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    let poll_id = create(&service, "alice", "Deploy on Friday?");
    let choices = service.store().choices_for_poll(poll_id).unwrap();

    service.vote("bob", poll_id, Some(choices[1].id)).unwrap();
    let results = service.vote("carol", poll_id, Some(choices[1].id)).unwrap();
    assert_eq!(results.total_votes, 2);
    assert_eq!(results.choices[1].percentage, 100.0);

    assert!(matches!(
        service.end_poll("bob", poll_id).unwrap_err(),
        Error::NotOwner { .. }
    ));
    let ended = service.end_poll("alice", poll_id).unwrap();
    assert!(!ended.poll.active);

    service.delete_poll("alice", poll_id).unwrap();
    assert!(matches!(
        service.poll_detail(poll_id).unwrap_err(),
        Error::PollNotFound(_)
    ));
    assert!(service.store().votes_for_poll(poll_id).unwrap().is_empty());
}

#[test]
fn test_summary_json() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    create(&service, "alice", "Serialize me?");

    let page = service.list_polls(&PollQuery::default()).unwrap();
    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(value["items"][0]["text"], "Serialize me?");
    assert_eq!(value["items"][0]["vote_count"], 0);
    assert_eq!(value["number"], 1);
}

#[test]
fn test_genre_forest_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let service = open(&dir);
        let music = service
            .add_genre(NewGenre {
                name: "Music".to_string(),
                parent: None,
            })
            .unwrap();
        for name in ["Rock", "Folk"] {
            service
                .add_genre(NewGenre {
                    name: name.to_string(),
                    parent: Some(music.id),
                })
                .unwrap();
        }
        service.store().flush().unwrap();
    }

    let service = open(&dir);
    let forest = service.genres().unwrap();
    assert_eq!(forest.len(), 1);
    let children: Vec<_> = forest[0]
        .children
        .iter()
        .map(|n| n.item.name.as_str())
        .collect();
    assert_eq!(children, vec!["Folk", "Rock"]);
}

#[test]
fn test_sample_tree_levels() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);

    let mut rows = Vec::new();
    for retailer in ["North", "South"] {
        rows.push(
            service
                .add_sample_data(SampleData {
                    retailer: Some(retailer.to_string()),
                    ..Default::default()
                })
                .unwrap(),
        );
    }

    let root = service
        .add_sample_node(NewSampleNode {
            datarow: Some(rows[0].pk_id),
            parent: None,
        })
        .unwrap();
    let child = service
        .add_sample_node(NewSampleNode {
            datarow: Some(rows[1].pk_id),
            parent: Some(root.id),
        })
        .unwrap();
    let grandchild = service
        .add_sample_node(NewSampleNode {
            datarow: None,
            parent: Some(child.id),
        })
        .unwrap();

    let roots = service.sample_roots().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].level, 0);
    assert_eq!(roots[0].parent.as_ref().unwrap().retailer.as_deref(), Some("North"));

    let second = &roots[0].children[0];
    assert_eq!(second.level, 1);
    assert_eq!(second.parent.as_ref().unwrap().retailer.as_deref(), Some("South"));
    assert_eq!(second.children[0].id, grandchild.id);
    assert_eq!(second.children[0].level, 2);
    assert!(second.children[0].parent.is_none());

    let subtree = service.sample_tree(Some(child.id)).unwrap();
    assert_eq!(subtree[0].id, child.id);
    assert_eq!(subtree[0].children.len(), 1);

    assert!(matches!(
        service.sample_tree(Some(u64::MAX)).unwrap_err(),
        Error::SampleNodeNotFound(_)
    ));
}
