use std::{ops::Deref, sync::Arc};

use crate::{
    ConfigError, LoadError, LoadState, Paginator, PartnerListOptions, PartnerRecord,
    PartnerSource,
};

/// A [`PartnerSource`] wired to a [`Paginator`]: the state behind a paginated partner table.
///
/// Derefs to the [`Paginator`], so the navigation and slice accessors are available directly.
/// Until the source has loaded (or if it failed) the list is empty with zero pages.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use partner_list::{PartnerList, PartnerListOptions};
///
/// let list = PartnerList::http(&PartnerListOptions::new())?;
/// list.load().await?;
/// list.next_page();
/// for partner in list.visible_slice() {
///     println!("{} ({})", partner.partner_name, partner.partner_type);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PartnerList {
    source: PartnerSource,
    paginator: Paginator<PartnerRecord>,
}

impl PartnerList {
    /// Paginate `source` according to `options`.
    pub fn new(source: PartnerSource, options: &PartnerListOptions) -> Result<Self, ConfigError> {
        let paginator = Paginator::new(
            {
                let source = source.clone();
                move || source.value()
            },
            options.page_size(),
        )?;
        Ok(Self { source, paginator })
    }

    /// Paginate partners fetched over http from [`PartnerListOptions::endpoint`].
    pub fn http(options: &PartnerListOptions) -> Result<Self, ConfigError> {
        Self::new(PartnerSource::http(options)?, options)
    }

    /// The source backing the list.
    pub fn source(&self) -> &PartnerSource {
        &self.source
    }

    /// The pagination state.
    pub fn paginator(&self) -> &Paginator<PartnerRecord> {
        &self.paginator
    }

    /// See [`PartnerSource::start`].
    pub fn start(&self) {
        self.source.start()
    }

    /// See [`PartnerSource::load`].
    pub async fn load(&self) -> Result<Arc<[PartnerRecord]>, LoadError> {
        self.source.load().await
    }

    /// See [`PartnerSource::reload`].
    pub async fn reload(&self) -> Result<Arc<[PartnerRecord]>, LoadError> {
        self.source.reload().await
    }

    /// See [`PartnerSource::state`].
    pub fn state(&self) -> LoadState<Arc<[PartnerRecord]>> {
        self.source.state()
    }

    /// See [`PartnerSource::is_loading`].
    pub fn is_loading(&self) -> bool {
        self.source.is_loading()
    }

    /// See [`PartnerSource::error`].
    pub fn error(&self) -> Option<LoadError> {
        self.source.error()
    }
}

impl Deref for PartnerList {
    type Target = Paginator<PartnerRecord>;

    fn deref(&self) -> &Self::Target {
        &self.paginator
    }
}
