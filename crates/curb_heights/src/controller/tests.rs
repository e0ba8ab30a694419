#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use crate::classifier::BandBounds;
    use crate::deferred::DeferredWork;
    use crate::network::{AssetCategory, NetworkKind, ParkingProp, SurfaceShader};
    use crate::overrides::{CohortParams, CustomOverride};
    use crate::pillars::PillarOffsets;
    use crate::test_harness::{
        bridge_profile, flat_strip, full_depth_profile, road_profile, segment, HeightFixture,
        StaticReplacements,
    };

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn assert_heights(actual: &[f32], expected: &[(usize, f32)]) {
        for &(index, y) in expected {
            assert!(
                approx(actual[index], y),
                "vertex {index}: expected {y}, got {}",
                actual[index]
            );
        }
    }

    /// Indices into `road_profile()`: ground, curb, sub-surface.
    const GROUND: usize = 0;
    const CURB: usize = 6;
    const BED: usize = 12;
    /// First deck vertex of `bridge_profile()`.
    const DECK: usize = 18;

    const PILLARS: PillarOffsets = PillarOffsets {
        offset: -1.55,
        middle_offset: -0.3,
    };

    // -----------------------------------------------------------------------
    // Scan
    // -----------------------------------------------------------------------

    #[test]
    fn test_scan_adjusts_stock_road() {
        let mut fx = HeightFixture::new();
        let mesh = fx.add_mesh("Basic Road", road_profile());
        let road = fx.add_asset("Basic Road", NetworkKind::Road, vec![mesh.clone()]);

        let reports = fx.scan_all();
        assert_eq!(reports[0].category, AssetCategory::Roads);
        assert_eq!(reports[0].assets_altered, 1);
        assert_eq!(reports[0].meshes_written, 1);

        let heights = fx.heights(&mesh);
        assert_heights(&heights, &[(GROUND, 0.0), (CURB, -0.15), (BED, -0.25)]);

        let lanes = fx.lane_offsets(road);
        assert!(approx(lanes[0], -0.15), "curb lane: {}", lanes[0]);
        assert_eq!(lanes[1], 0.0);
        assert!(approx(fx.surface_level(road).unwrap(), -0.15));
    }

    #[test]
    fn test_scan_records_untouched_originals() {
        let mut fx = HeightFixture::new();
        let mesh = fx.add_mesh("Basic Road", road_profile());
        let road = fx.add_asset("Basic Road", NetworkKind::Road, vec![mesh]);
        fx.scan_all();

        let store = fx.controller.records(AssetCategory::Roads).unwrap();
        let record = store.get(road).unwrap();
        let component = &record.segments[&0];
        assert_eq!(component.owner, road);
        assert_eq!(&*component.main.as_ref().unwrap().original, road_profile().as_slice());
        assert_eq!(record.surface_level, -0.3);
        assert_eq!(record.lanes.get(&0), Some(&-0.3));
        assert!(!record.lanes.contains_key(&1));
    }

    #[test]
    fn test_quorum_boundary_decides_recording() {
        let mut fx = HeightFixture::new();
        let mut three = flat_strip(0.0, 8);
        three.extend(flat_strip(-0.3, 3));
        let mut four = flat_strip(0.0, 8);
        four.extend(flat_strip(-0.3, 4));
        let mesh3 = fx.add_mesh("three", three);
        let mesh4 = fx.add_mesh("four", four);
        let a = fx.add_asset("three", NetworkKind::Road, vec![mesh3.clone()]);
        let b = fx.add_asset("four", NetworkKind::Road, vec![mesh4.clone()]);

        fx.scan_all();

        let store = fx.controller.records(AssetCategory::Roads).unwrap();
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
        assert_eq!(fx.heights(&mesh3)[8], -0.3);
        assert!(approx(fx.heights(&mesh4)[8], -0.15));
        assert_eq!(fx.lane_offsets(a), vec![-0.3, 0.0]);
    }

    #[test]
    fn test_shared_mesh_written_once() {
        let mut fx = HeightFixture::new();
        let shared = fx.add_mesh("Shared Segment", road_profile());
        let a = fx.add_asset("Road A", NetworkKind::Road, vec![shared.clone()]);
        let b = fx.add_asset("Road B", NetworkKind::Road, vec![shared.clone(), shared.clone()]);

        let reports = fx.scan_all();
        assert_eq!(reports[0].meshes_written, 1);
        assert_heights(&fx.heights(&shared), &[(CURB, -0.15), (BED, -0.25)]);

        // Every owner keeps a record so each can restore it.
        let store = fx.controller.records(AssetCategory::Roads).unwrap();
        assert_eq!(store.get(a).unwrap().segments.len(), 1);
        assert_eq!(store.get(b).unwrap().segments.len(), 2);

        fx.apply_all();
        assert_heights(&fx.heights(&shared), &[(CURB, -0.15), (BED, -0.25)]);

        fx.revert_all();
        assert_eq!(fx.heights(&shared), road_profile().iter().map(|p| p[1]).collect::<Vec<_>>());
    }

    #[test]
    fn test_shader_filter_on_default_assets() {
        let mut fx = HeightFixture::new();
        let pedestrian = fx.add_mesh("sidewalk", road_profile());
        let road = fx.add_asset_with(
            "Plain Road",
            NetworkKind::Road,
            vec![segment(Some(pedestrian.clone()), None, SurfaceShader::Pedestrian)],
            Vec::new(),
            None,
        );

        fx.scan_all();
        assert_eq!(fx.heights(&pedestrian)[CURB], -0.3);
        assert!(fx
            .controller
            .records(AssetCategory::Roads)
            .unwrap()
            .get(road)
            .is_none());
    }

    #[test]
    fn test_nodes_are_scanned_like_segments() {
        let mut fx = HeightFixture::new();
        let node_mesh = fx.add_mesh("node", road_profile());
        let road = fx.add_asset_with(
            "Junction",
            NetworkKind::Road,
            Vec::new(),
            vec![segment(Some(node_mesh.clone()), None, SurfaceShader::Road)],
            None,
        );

        fx.scan_all();
        assert!(approx(fx.heights(&node_mesh)[CURB], -0.15));
        let record = fx
            .controller
            .records(AssetCategory::Roads)
            .unwrap()
            .get(road)
            .unwrap();
        assert!(record.segments.is_empty());
        assert_eq!(record.nodes.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Apply / revert
    // -----------------------------------------------------------------------

    #[test]
    fn test_apply_is_idempotent() {
        let mut fx = HeightFixture::new();
        let mesh = fx.add_mesh("Basic Road", road_profile());
        let road = fx.add_asset("Basic Road", NetworkKind::Road, vec![mesh.clone()]);
        fx.scan_all();

        fx.settings.curb_height = 0.2;
        fx.apply_all();
        let once = fx.heights(&mesh);
        let lanes_once = fx.lane_offsets(road);
        fx.apply_all();
        fx.apply_all();

        assert_eq!(fx.heights(&mesh), once);
        assert_eq!(fx.lane_offsets(road), lanes_once);
        assert_heights(&once, &[(GROUND, 0.0), (CURB, -0.2), (BED, -0.3)]);
        assert!(approx(lanes_once[0], -0.2));
    }

    #[test]
    fn test_revert_round_trip_is_exact() {
        let mut fx = HeightFixture::new();
        let mesh = fx.add_mesh("Basic Road", road_profile());
        let road = fx.add_asset("Basic Road", NetworkKind::Road, vec![mesh.clone()]);
        fx.scan_all();
        fx.settings.curb_height = 0.07;
        fx.apply_all();

        fx.revert_all();
        let restored = crate::test_harness::positions_of(&fx.meshes, mesh.id());
        assert_eq!(restored, road_profile());
        assert_eq!(fx.lane_offsets(road), vec![-0.3, 0.0]);
        assert_eq!(fx.surface_level(road), Some(-0.3));

        // Records survive a revert; apply works again afterwards.
        assert_eq!(fx.controller.records(AssetCategory::Roads).unwrap().len(), 1);
        fx.apply_all();
        assert!(approx(fx.heights(&mesh)[CURB], -0.07));
    }

    #[test]
    fn test_full_rescan_does_not_compound() {
        let mut fx = HeightFixture::new();
        let mesh = fx.add_mesh("Basic Road", road_profile());
        fx.add_asset("Basic Road", NetworkKind::Road, vec![mesh.clone()]);

        fx.scan_all();
        fx.scan_all();
        assert_heights(&fx.heights(&mesh), &[(CURB, -0.15), (BED, -0.25)]);
        assert_eq!(fx.controller.records(AssetCategory::Roads).unwrap().len(), 1);
    }

    #[test]
    fn test_single_category_rescan() {
        let mut fx = HeightFixture::new();
        let mesh = fx.add_mesh("Basic Road", road_profile());
        fx.add_asset("Basic Road", NetworkKind::Road, vec![mesh.clone()]);

        for _ in 0..2 {
            let (controller, settings, mut ctx) = fx.split();
            let report = controller.scan(AssetCategory::Roads, settings, &mut ctx);
            assert_eq!(report.assets_altered, 1);
        }
        assert!(fx.controller.is_scanned());
        assert_heights(&fx.heights(&mesh), &[(CURB, -0.15), (BED, -0.25)]);
    }

    #[test]
    fn test_lods_follow_setting() {
        let mut fx = HeightFixture::new();
        fx.settings.include_lods = false;
        let main = fx.add_mesh("main", road_profile());
        let lod = fx.add_mesh("lod", road_profile());
        fx.add_asset_with(
            "Road With Lod",
            NetworkKind::Road,
            vec![segment(Some(main.clone()), Some(lod.clone()), SurfaceShader::Road)],
            Vec::new(),
            None,
        );

        fx.scan_all();
        assert!(approx(fx.heights(&main)[CURB], -0.15));
        assert_eq!(fx.heights(&lod)[CURB], -0.3);

        fx.settings.include_lods = true;
        fx.apply_all();
        assert!(approx(fx.heights(&lod)[CURB], -0.15));

        fx.settings.include_lods = false;
        fx.apply_all();
        assert_eq!(fx.heights(&lod)[CURB], -0.3);
    }

    // -----------------------------------------------------------------------
    // Bridges and pillars
    // -----------------------------------------------------------------------

    #[test]
    fn test_bridge_deck_and_pillars() {
        let mut fx = HeightFixture::new();
        let deck = fx.add_mesh("Highway Bridge", bridge_profile());
        let segments = vec![segment(Some(deck.clone()), None, SurfaceShader::Road)];
        let bridge =
            fx.add_asset_with("Highway Bridge", NetworkKind::Bridge, segments, Vec::new(), Some(PILLARS));

        fx.scan_all();
        assert_heights(&fx.heights(&deck), &[(CURB, -0.15), (BED, -0.25), (DECK, -0.775)]);

        let record = fx
            .controller
            .records(AssetCategory::Roads)
            .unwrap()
            .get(bridge)
            .unwrap();
        assert!(record.pillars_eligible);
        assert_eq!(record.pillars, Some(PILLARS));

        let deferred = fx.take_deferred();
        assert_eq!(deferred.len(), 2);
        let DeferredWork::PushPillars { updates } = &deferred[1] else {
            panic!("expected pillar push, got {:?}", deferred[1]);
        };
        assert_eq!(updates[0].0, bridge);
        assert!(approx(updates[0].1.offset, -1.05), "got {}", updates[0].1.offset);
        assert_eq!(updates[0].1.middle_offset, -0.3);
    }

    #[test]
    fn test_bridges_disabled_restores_deck_and_pillars() {
        let mut fx = HeightFixture::new();
        let deck = fx.add_mesh("Highway Bridge", bridge_profile());
        let segments = vec![segment(Some(deck.clone()), None, SurfaceShader::Road)];
        let bridge =
            fx.add_asset_with("Highway Bridge", NetworkKind::Bridge, segments, Vec::new(), Some(PILLARS));
        fx.scan_all();
        fx.take_deferred();

        fx.settings.bridges_enabled = false;
        fx.apply_all();
        assert_eq!(fx.heights(&deck)[DECK], -1.0);
        assert!(approx(fx.heights(&deck)[CURB], -0.15));

        let pushed: Vec<_> = fx
            .take_deferred()
            .into_iter()
            .filter_map(|w| match w {
                DeferredWork::PushPillars { updates } => Some(updates),
                _ => None,
            })
            .collect();
        assert_eq!(pushed, vec![vec![(bridge, PILLARS)]]);
    }

    #[test]
    fn test_full_depth_mesh_keeps_deck() {
        let mut fx = HeightFixture::new();
        let dam = fx.add_mesh("Dam", full_depth_profile());
        let segments = vec![segment(Some(dam.clone()), None, SurfaceShader::Road)];
        let id = fx.add_asset_with("Dam", NetworkKind::Dam, segments, Vec::new(), Some(PILLARS));

        fx.scan_all();
        let heights = fx.heights(&dam);
        assert_heights(&heights, &[(CURB, -0.15), (DECK, -1.0)]);
        assert_eq!(*heights.last().unwrap(), -8.0);

        let record = fx
            .controller
            .records(AssetCategory::Roads)
            .unwrap()
            .get(id)
            .unwrap();
        assert!(!record.pillars_eligible);
        assert!(!fx
            .take_deferred()
            .iter()
            .any(|w| matches!(w, DeferredWork::PushPillars { .. })));
    }

    #[test]
    fn test_plain_road_ignores_deck_band() {
        let mut fx = HeightFixture::new();
        let mesh = fx.add_mesh("Elevated Road", bridge_profile());
        fx.add_asset("Elevated Road", NetworkKind::Road, vec![mesh.clone()]);

        fx.scan_all();
        assert_eq!(fx.heights(&mesh)[DECK], -1.0);
    }

    #[test]
    fn test_revert_pushes_original_pillars() {
        let mut fx = HeightFixture::new();
        let deck = fx.add_mesh("Bridge", bridge_profile());
        let segments = vec![segment(Some(deck), None, SurfaceShader::Road)];
        let bridge =
            fx.add_asset_with("Bridge", NetworkKind::Bridge, segments, Vec::new(), Some(PILLARS));
        fx.scan_all();
        fx.take_deferred();

        fx.revert_all();
        assert_eq!(fx.pillars(bridge), Some(PILLARS));
        let deferred = fx.take_deferred();
        assert!(deferred.contains(&DeferredWork::PushPillars {
            updates: vec![(bridge, PILLARS)]
        }));
    }

    #[test]
    fn test_rescan_records_original_pillars() {
        let mut fx = HeightFixture::new();
        let deck = fx.add_mesh("Bridge", bridge_profile());
        let segments = vec![segment(Some(deck), None, SurfaceShader::Road)];
        let bridge =
            fx.add_asset_with("Bridge", NetworkKind::Bridge, segments, Vec::new(), Some(PILLARS));

        for _ in 0..3 {
            fx.scan_all();
            fx.run_deferred();
            let adjusted = fx.pillars(bridge).unwrap();
            assert!(approx(adjusted.offset, -1.05), "got {}", adjusted.offset);

            let record = fx
                .controller
                .records(AssetCategory::Roads)
                .unwrap()
                .get(bridge)
                .unwrap();
            assert_eq!(record.pillars, Some(PILLARS));
        }

        fx.revert_all();
        fx.run_deferred();
        assert_eq!(fx.pillars(bridge), Some(PILLARS));
    }

    #[test]
    fn test_rescan_before_drain_ends_on_adjusted_pillars() {
        let mut fx = HeightFixture::new();
        let deck = fx.add_mesh("Bridge", bridge_profile());
        let segments = vec![segment(Some(deck), None, SurfaceShader::Road)];
        let bridge =
            fx.add_asset_with("Bridge", NetworkKind::Bridge, segments, Vec::new(), Some(PILLARS));

        fx.scan_all();
        fx.settings.bridge_scale = 0.75;
        fx.scan_all();
        fx.run_deferred();

        // Scaled from the recorded -1.55 about the -0.55 pivot, not from the
        // -1.05 pushed by the first scan.
        let pillars = fx.pillars(bridge).unwrap();
        assert!(approx(pillars.offset, -1.3), "got {}", pillars.offset);
        assert_eq!(pillars.middle_offset, -0.3);

        fx.revert_all();
        assert_eq!(fx.pillars(bridge), Some(PILLARS));
    }

    // -----------------------------------------------------------------------
    // Overrides
    // -----------------------------------------------------------------------

    #[test]
    fn test_custom_override_drives_bands_and_skips_shader_filter() {
        let mut fx = HeightFixture::new();
        fx.registry.insert_custom(
            "100",
            CustomOverride {
                bands: BandBounds {
                    primary_upper: -0.12,
                    primary_lower: -0.26,
                    ..Default::default()
                },
                original_curb: -0.25,
                fixed_target: None,
            },
        );
        let mut shallow = flat_strip(0.0, 4);
        shallow.extend(flat_strip(-0.2, 6));
        let custom_mesh = fx.add_mesh("custom", shallow.clone());
        let stock_mesh = fx.add_mesh("stock", shallow);
        fx.add_asset_with(
            "100.Shallow Road_Data",
            NetworkKind::Road,
            vec![segment(Some(custom_mesh.clone()), None, SurfaceShader::Other)],
            Vec::new(),
            None,
        );
        fx.add_asset("200.Shallow Road_Data", NetworkKind::Road, vec![stock_mesh.clone()]);

        fx.scan_all();
        assert!(approx(fx.heights(&custom_mesh)[4], -0.12));
        assert_eq!(fx.heights(&stock_mesh)[4], -0.2);
    }

    #[test]
    fn test_zero_depth_override_leaves_finite_heights() {
        let mut fx = HeightFixture::new();
        fx.registry = crate::overrides::OverrideRegistry::from_json(
            r#"{ "custom": { "77": { "original_curb": 0.0, "fixed_target": 0.1 } } }"#,
        )
        .unwrap();
        let mesh = fx.add_mesh("odd", road_profile());
        let odd = fx.add_asset("77.Odd Road", NetworkKind::Road, vec![mesh.clone()]);

        fx.scan_all();
        let heights = fx.heights(&mesh);
        assert!(heights.iter().all(|y| y.is_finite()), "{heights:?}");
        // The entry was dropped, so the asset follows the stock defaults.
        assert_heights(&heights, &[(GROUND, 0.0), (CURB, -0.15), (BED, -0.25)]);
        assert!(fx.lane_offsets(odd).iter().all(|y| y.is_finite()));
    }

    #[test]
    fn test_cohort_target_ignores_user_curb() {
        let mut fx = HeightFixture::new();
        fx.registry.insert_cohort(
            "thin",
            CohortParams {
                bands: BandBounds::default(),
                original_curb: -0.3,
                target_height: 0.1,
            },
        );
        fx.registry.add_cohort_member("300", "thin");
        let mesh = fx.add_mesh("thin", road_profile());
        fx.add_asset("300.Thin Curb Road", NetworkKind::Road, vec![mesh.clone()]);

        fx.scan_all();
        assert!(approx(fx.heights(&mesh)[CURB], -0.1));

        fx.settings.curb_height = 0.25;
        fx.apply_all();
        assert!(approx(fx.heights(&mesh)[CURB], -0.1));
    }

    #[test]
    fn test_bridge_exclusion_keeps_deck() {
        let mut fx = HeightFixture::new();
        fx.registry.exclude_bridge("400");
        let deck = fx.add_mesh("deck", bridge_profile());
        let segments = vec![segment(Some(deck.clone()), None, SurfaceShader::Road)];
        let id =
            fx.add_asset_with("400.Odd Bridge", NetworkKind::Bridge, segments, Vec::new(), Some(PILLARS));

        fx.scan_all();
        assert_eq!(fx.heights(&deck)[DECK], -1.0);
        assert!(approx(fx.heights(&deck)[CURB], -0.15));
        let record = fx
            .controller
            .records(AssetCategory::Roads)
            .unwrap()
            .get(id)
            .unwrap();
        assert!(!record.pillars_eligible);
    }

    // -----------------------------------------------------------------------
    // Paths
    // -----------------------------------------------------------------------

    #[test]
    fn test_paths_use_path_heights() {
        let mut fx = HeightFixture::new();
        fx.settings.path_curb_height = 0.1;
        let mesh = fx.add_mesh("walkway", road_profile());
        let path = fx.add_asset("Gravel Path", NetworkKind::Path, vec![mesh.clone()]);

        let reports = fx.scan_all();
        assert_eq!(reports[1].category, AssetCategory::Paths);
        assert_eq!(reports[1].assets_altered, 1);
        assert!(approx(fx.heights(&mesh)[CURB], -0.1));
        // Default path base height equals the stock depth.
        assert!(approx(fx.lane_offsets(path)[0], -0.3));

        fx.settings.path_base_height = 0.2;
        fx.apply_all();
        assert!(approx(fx.lane_offsets(path)[0], -0.2));
        assert!(approx(fx.surface_level(path).unwrap(), -0.2));
        assert!(approx(fx.heights(&mesh)[CURB], -0.1));
    }

    // -----------------------------------------------------------------------
    // Unreadable and malformed input
    // -----------------------------------------------------------------------

    #[test]
    fn test_unreadable_mesh_is_replaced() {
        let mut fx = HeightFixture::new();
        let mut replacements = StaticReplacements::default();
        replacements
            .meshes
            .insert("Locked Road".to_string(), road_profile());
        fx.with_replacements(replacements);

        let locked = fx.add_render_only_mesh("Locked Road", road_profile());
        let road = fx.add_asset("Locked Road", NetworkKind::Road, vec![locked.clone()]);

        let reports = fx.scan_all();
        assert_eq!(reports[0].pieces_skipped, 0);

        let swapped = fx.segment_mesh(road, 0).unwrap();
        assert_ne!(swapped.id(), locked.id());
        assert!(approx(fx.heights(&swapped)[CURB], -0.15));
    }

    #[test]
    fn test_unreadable_mesh_without_replacement_is_skipped() {
        let mut fx = HeightFixture::new();
        let locked = fx.add_render_only_mesh("Locked Road", road_profile());
        let fine = fx.add_mesh("Basic Road", road_profile());
        let a = fx.add_asset("Locked Road", NetworkKind::Road, vec![locked]);
        let b = fx.add_asset("Basic Road", NetworkKind::Road, vec![fine.clone()]);

        let reports = fx.scan_all();
        assert_eq!(reports[0].pieces_skipped, 1);
        let store = fx.controller.records(AssetCategory::Roads).unwrap();
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
        assert!(approx(fx.heights(&fine)[CURB], -0.15));
    }

    #[test]
    fn test_malformed_asset_is_skipped() {
        let mut fx = HeightFixture::new();
        fx.add_asset_with("Empty", NetworkKind::Road, Vec::new(), Vec::new(), None);
        let mesh = fx.add_mesh("Basic Road", road_profile());
        fx.add_asset("Basic Road", NetworkKind::Road, vec![mesh.clone()]);

        let reports = fx.scan_all();
        assert_eq!(reports[0].assets_skipped, 1);
        assert_eq!(reports[0].assets_altered, 1);
        assert!(approx(fx.heights(&mesh)[CURB], -0.15));
    }

    // -----------------------------------------------------------------------
    // Deferred work
    // -----------------------------------------------------------------------

    #[test]
    fn test_one_lane_job_per_cycle() {
        let mut fx = HeightFixture::new();
        for name in ["Road A", "Road B", "Road C"] {
            let mesh = fx.add_mesh(name, road_profile());
            fx.add_asset(name, NetworkKind::Road, vec![mesh]);
        }

        fx.scan_all();
        let deferred = fx.take_deferred();
        assert_eq!(deferred.len(), 1);
        match &deferred[0] {
            DeferredWork::RefreshLanes { category, assets } => {
                assert_eq!(*category, AssetCategory::Roads);
                assert_eq!(assets.len(), 3);
            }
            other => panic!("expected lane refresh, got {other:?}"),
        }

        fx.apply_all();
        assert_eq!(fx.take_deferred().len(), 1);
        fx.revert_all();
        assert_eq!(fx.take_deferred().len(), 1);
    }

    #[test]
    fn test_manual_pillars_skip_push_on_apply() {
        let mut fx = HeightFixture::new();
        fx.settings.auto_update_pillars = false;
        let deck = fx.add_mesh("Bridge", bridge_profile());
        let segments = vec![segment(Some(deck), None, SurfaceShader::Road)];
        fx.add_asset_with("Bridge", NetworkKind::Bridge, segments, Vec::new(), Some(PILLARS));

        fx.scan_all();
        fx.apply_all();
        assert!(!fx
            .take_deferred()
            .iter()
            .any(|w| matches!(w, DeferredWork::PushPillars { .. })));
    }

    // -----------------------------------------------------------------------
    // Parking
    // -----------------------------------------------------------------------

    fn parking_props() -> Vec<ParkingProp> {
        vec![
            ParkingProp {
                position: Vec3::new(1.0, -0.3, 2.0),
            },
            ParkingProp {
                position: Vec3::new(0.0, 1.0, 0.0),
            },
        ]
    }

    #[test]
    fn test_parking_round_trip() {
        let mut fx = HeightFixture::new();
        fx.registry.add_parking_id("9001");
        let lot_mesh = fx.add_mesh("lot", road_profile());
        let other_mesh = fx.add_mesh("other", road_profile());
        let lot = fx
            .parking
            .add("9001.Parking Lot_Data", Some(lot_mesh.clone()), parking_props());
        fx.parking
            .add("9002.Parking Lot_Data", Some(other_mesh.clone()), parking_props());

        let reports = fx.scan_all();
        assert_eq!(reports[2].category, AssetCategory::Parking);
        assert_eq!(reports[2].assets_altered, 1);

        // Curb band only: the bed stays where it was.
        assert_heights(&fx.heights(&lot_mesh), &[(CURB, -0.15), (BED, -0.4)]);
        assert_eq!(fx.heights(&other_mesh)[CURB], -0.3);
        let props = &fx.parking.get(lot).unwrap().props;
        assert!(approx(props[0].position.y, -0.15));
        assert_eq!(props[1].position.y, 1.0);

        fx.revert_all();
        assert_eq!(
            crate::test_harness::positions_of(&fx.meshes, lot_mesh.id()),
            road_profile()
        );
        assert_eq!(fx.parking.get(lot).unwrap().props[0].position.y, -0.3);
    }

    #[test]
    fn test_parking_mesh_shared_with_road_is_not_recorded_twice() {
        let mut fx = HeightFixture::new();
        fx.registry.add_parking_id("9001");
        let shared = fx.add_mesh("shared", road_profile());
        fx.add_asset("Road", NetworkKind::Road, vec![shared.clone()]);
        let lot = fx.parking.add("9001.Lot", Some(shared.clone()), Vec::new());

        fx.scan_all();
        let record = fx.controller.parking_records().get(lot).unwrap();
        assert_eq!(record.mesh, Some(shared.id()));
        assert!(record.original.is_none());

        fx.apply_all();
        assert_heights(&fx.heights(&shared), &[(CURB, -0.15), (BED, -0.25)]);
        fx.revert_all();
        assert_eq!(fx.heights(&shared)[CURB], -0.3);
    }
}
