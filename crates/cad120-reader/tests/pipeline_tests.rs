//! End-to-end tests over a miniature dataset.

use std::fs;
use std::path::{Path, PathBuf};

use cad120_models::{Joint, JointFilter, VideoKey};
use cad120_reader::{Cad120Reader, CacheStrategy, ReaderConfig, ReaderError};
use tempfile::TempDir;

struct Dataset {
    _root: TempDir,
    labels: PathBuf,
    tracks: PathBuf,
    cache: PathBuf,
}

fn activity_dir(root: &Path, subject: &str, activity: &str) -> PathBuf {
    let dir = root
        .join("annotations")
        .join(format!("{}_annotations", subject))
        .join(activity);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn skeleton_line(frame: u32, x: f64) -> String {
    let mut fields = vec![frame.to_string()];
    for joint in Joint::ALL {
        if joint.has_orientation() {
            fields.extend(["1", "0", "0", "0", "1", "0", "0", "0", "1", "1"].map(String::from));
        }
        let offset = joint.index() as f64;
        fields.extend([
            (x + offset).to_string(),
            (-offset * 10.0).to_string(),
            "2000".to_string(),
            "1".to_string(),
        ]);
    }
    format!("{},\n", fields.join(","))
}

fn dataset() -> Dataset {
    let root = TempDir::new().unwrap();
    let labels = root.path().join("labels");
    let tracks = root.path().join("tracks");
    let cache = root.path().join("cache");

    let meal = activity_dir(&labels, "Subject1", "having_meal");
    fs::write(
        meal.join("labeling.txt"),
        "v1,1,2,reaching\nv1,3,4,eating\nv2,1,3,null\n",
    )
    .unwrap();
    let cereal = activity_dir(&labels, "Subject1", "making_cereal");
    fs::write(cereal.join("labeling.txt"), "c1,1,2,pouring\n").unwrap();

    let meal_tracks = activity_dir(&tracks, "Subject1", "having_meal");
    fs::write(
        meal_tracks.join("activityLabel.txt"),
        "v1,having_meal,Subject1,1:bowl,2:spoon,\nv2,having_meal,Subject1,1:cup,\n",
    )
    .unwrap();
    fs::write(
        meal_tracks.join("v1_obj1.txt"),
        "1,1,10,10,30,50,0,0,0,0,0,0\n2,1,0,0,0,0,0,0,0,0,0,0\n3,1,12,10,32,50,0,0,0,0,0,0\n",
    )
    .unwrap();
    fs::write(
        meal_tracks.join("v1_obj2.txt"),
        "1,2,0,0,0,0,0,0,0,0,0,0\n2,2,100,100,110,140,0,0,0,0,0,0\n",
    )
    .unwrap();
    let skeleton: String = (1..=3).map(|f| skeleton_line(f, f as f64 * 10.0)).collect();
    fs::write(meal_tracks.join("v1.txt"), format!("{}END\n", skeleton)).unwrap();
    fs::write(meal_tracks.join("v2_obj1.txt"), "1,1,5,5,15,15,0,0,0,0,0,0\n").unwrap();

    Dataset {
        _root: root,
        labels,
        tracks,
        cache,
    }
}

fn config(data: &Dataset) -> ReaderConfig {
    ReaderConfig::new(&data.labels, &data.tracks, &data.cache)
        .with_subjects(vec!["Subject1".to_string()])
        .with_activities(vec!["having_meal".to_string(), "making_cereal".to_string()])
}

#[test]
fn test_build_from_raw_files() {
    let data = dataset();
    let reader = Cad120Reader::build(config(&data)).unwrap();

    assert_eq!(reader.segmentations().len(), 3);
    let sequences = reader.sub_sequences_by_key();
    assert_eq!(
        sequences["Subject1_having_meal_v1"],
        vec!["reaching", "reaching", "eating", "eating"]
    );
    assert_eq!(sequences["Subject1_making_cereal_c1"].len(), 2);

    let traces = reader.traces().unwrap();
    assert_eq!(
        traces.keys().collect::<Vec<_>>(),
        vec!["Subject1_having_meal_v1", "Subject1_having_meal_v2"]
    );

    let v1 = reader.trace("Subject1_having_meal_v1").unwrap();
    assert_eq!(v1.sorted_timestamps(), vec![1, 2, 3]);

    // Occluded frame 2 repeats frame 1's box.
    let bowl = v1.object_state(2, "bowl_1").unwrap();
    assert_eq!((bowl.x, bowl.y, bowl.width, bowl.length), (20.0, 30.0, Some(20.0), Some(40.0)));
    // Spoon is occluded before its first detection.
    assert!(v1.object_state(1, "spoon_2").is_none());
    assert!(v1.object_state(2, "spoon_2").is_some());
    // Default filter passes head and hands only.
    assert!(v1.object_state(1, "H").is_some());
    assert!(v1.object_state(1, "T").is_none());

    let v2 = reader.trace("Subject1_having_meal_v2").unwrap();
    assert!(v2.object_state(1, "cup_1").is_some());
    assert!(v2.object_state(1, "H").is_none());
}

#[test]
fn test_save_then_load_matches_build() {
    let data = dataset();
    let built = Cad120Reader::build(config(&data)).unwrap();
    built.save().unwrap();

    let strategy = CacheStrategy::select(&config(&data).cache_artifacts(), true);
    assert_eq!(strategy, CacheStrategy::Hit);
    let loaded = Cad120Reader::open(config(&data), strategy).unwrap();

    assert_eq!(loaded.segmentations(), built.segmentations());
    assert_eq!(loaded.sub_sequences_by_key(), built.sub_sequences_by_key());
    assert_eq!(loaded.traces(), built.traces());
    assert_eq!(loaded.all_skeleton_trajectories(), built.all_skeleton_trajectories());
}

#[test]
fn test_no_tracks_mode() {
    let data = dataset();
    let reader = Cad120Reader::build(config(&data).with_read_tracks(false)).unwrap();
    assert!(reader.traces().is_none());
    assert_eq!(reader.sequences().len(), 3);
    assert!(reader.skeleton_trajectories("Subject1_having_meal_v1").is_none());

    reader.save().unwrap();
    assert!(!data.cache.join("ground_truth_tracks.json.gz").exists());

    let no_tracks = config(&data).with_read_tracks(false);
    assert_eq!(
        CacheStrategy::select(&no_tracks.cache_artifacts(), true),
        CacheStrategy::Hit
    );
    assert_eq!(
        CacheStrategy::select(&config(&data).cache_artifacts(), true),
        CacheStrategy::Miss
    );
}

#[test]
fn test_episode_restricts_every_stage() {
    let data = dataset();
    let episode: VideoKey = "Subject1_having_meal_v1".parse().unwrap();
    let reader = Cad120Reader::build(
        config(&data)
            .with_episode(episode)
            .with_skeleton_filter(JointFilter::All),
    )
    .unwrap();

    assert_eq!(reader.segmentations().len(), 1);
    assert_eq!(reader.traces().unwrap().len(), 1);

    let trajectories = reader.skeleton_trajectories("Subject1_having_meal_v1").unwrap();
    assert_eq!(trajectories.len(), 15);
    assert_eq!(trajectories[&Joint::Torso].len(), 3);
}

#[test]
fn test_loaded_episode_is_filtered() {
    let data = dataset();
    Cad120Reader::build(config(&data)).unwrap().save().unwrap();

    let episode: VideoKey = "Subject1_having_meal_v2".parse().unwrap();
    let loaded = Cad120Reader::load(config(&data).with_episode(episode)).unwrap();
    assert_eq!(loaded.sequences().len(), 1);
    assert_eq!(
        loaded.traces().unwrap().keys().collect::<Vec<_>>(),
        vec!["Subject1_having_meal_v2"]
    );
}

#[test]
fn test_parallel_build_matches_sequential() {
    let data = dataset();
    let labels = activity_dir(&data.labels, "Subject3", "having_meal");
    fs::write(labels.join("labeling.txt"), "w1,1,3,reaching\nw1,4,4,placing\n").unwrap();
    let tracks = activity_dir(&data.tracks, "Subject3", "having_meal");
    fs::write(tracks.join("activityLabel.txt"), "w1,having_meal,Subject3,1:plate,\n").unwrap();
    fs::write(tracks.join("w1_obj1.txt"), "1,1,2,2,6,8,0,0,0,0,0,0\n2,1,0,0,0,0,0,0,0,0,0,0\n").unwrap();
    let skeleton: String = (1..=2).map(|f| skeleton_line(f, -(f as f64))).collect();
    fs::write(tracks.join("w1.txt"), format!("{}END\n", skeleton)).unwrap();

    let both = || {
        config(&data).with_subjects(vec!["Subject1".to_string(), "Subject3".to_string()])
    };
    let sequential = Cad120Reader::build(both()).unwrap();
    let parallel = Cad120Reader::build(both().with_parallel(true)).unwrap();

    assert!(parallel.config().parallel);
    assert_eq!(sequential.traces().map(|t| t.len()), Some(3));
    assert_eq!(parallel.traces(), sequential.traces());
    assert_eq!(parallel.segmentations(), sequential.segmentations());
    assert_eq!(parallel.sub_sequences_by_key(), sequential.sub_sequences_by_key());
}

#[test]
fn test_non_contiguous_segments_abort_the_run() {
    let data = dataset();
    let dir = activity_dir(&data.labels, "Subject1", "making_cereal");
    fs::write(dir.join("labeling.txt"), "c1,1,2,pouring\nc1,4,5,moving\n").unwrap();

    let result = Cad120Reader::build(config(&data));
    assert!(matches!(result, Err(ReaderError::NonContiguousSegments { next_start: 4, .. })));
}

#[test]
fn test_load_without_cache_is_cache_miss() {
    let data = dataset();
    match Cad120Reader::load(config(&data)) {
        Err(e) => assert!(e.is_cache_miss()),
        Ok(_) => panic!("expected a cache miss"),
    }
}
