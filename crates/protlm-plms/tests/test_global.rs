//! The global bundle lives in a `OnceLock`, so these tests get their own binary.
mod common;

use anyhow::Result;
use candle_core::Device;
use common::organism_only_root;
use protlm_plms::{global, init_global, is_ready, predict_global, ProtlmError};
use tempfile::TempDir;

#[test]
fn test_global_lifecycle() -> Result<()> {
    assert!(!is_ready());
    assert!(matches!(global(), Err(ProtlmError::NotReady)));
    assert!(matches!(predict_global("EGH"), Err(ProtlmError::NotReady)));

    let tmp = TempDir::new()?;
    let config = organism_only_root(tmp.path())?;

    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| init_global(&config, &Device::Cpu).map(|b| b as *const _ as usize)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("init thread panicked"))
            .collect::<protlm_plms::Result<Vec<_>>>()
    })?;
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));

    assert!(is_ready());
    let bundle = global()?;
    assert_eq!(bundle as *const _ as usize, addresses[0]);

    // already initialized: a bogus config is never loaded
    let bogus = protlm_plms::BundleConfig::from_root(tmp.path().join("nowhere"));
    assert_eq!(init_global(&bogus, &Device::Cpu)? as *const _ as usize, addresses[0]);

    let response = predict_global("EGH")?;
    assert_eq!(response.blosum_matrix.residues, vec!['E', 'G', 'H']);
    Ok(())
}
