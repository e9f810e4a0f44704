//! Content and admin-tooling handlers: blog, email templates, SEO metadata,
//! redirects, and traffic analytics.

use serde_json::Value;

use portal_core::models::{BlogPost, EmailTemplate, PostStatus, Redirect, SeoMetadata};
use portal_core::services::{BulkMailer, EmailBatch, PageViewCount, PageViews};

use crate::{ApiError, ApiResult, Caller, PortalApi, SimpleResponse};

impl PortalApi {
    // =========================================================================
    // Blog
    // =========================================================================

    pub fn create_blog_post(&self, caller: &Caller, post: BlogPost) -> ApiResult<BlogPost> {
        self.ensure_staff(caller)?;
        self.create_record(post)
    }

    pub fn update_blog_post(
        &self,
        caller: &Caller,
        post_id: &str,
        partial: Value,
    ) -> ApiResult<BlogPost> {
        self.ensure_staff(caller)?;
        self.update_record(post_id, partial)
    }

    pub fn delete_blog_post(&self, caller: &Caller, post_id: &str) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<BlogPost>(post_id)
    }

    /// Staff see everything; the public site lists published posts only.
    pub fn list_blog_posts(&self, caller: Option<&Caller>) -> ApiResult<Vec<BlogPost>> {
        let posts: Vec<BlogPost> = self.list_records()?;
        let staff = caller.map_or(false, |c| self.ensure_staff(c).is_ok());
        Ok(posts
            .into_iter()
            .filter(|post| staff || post.status == PostStatus::Published)
            .collect())
    }

    /// Public lookup by slug and locale; drafts are invisible.
    pub fn blog_post_by_slug(&self, slug: &str, locale: &str) -> ApiResult<BlogPost> {
        let posts: Vec<BlogPost> = self.list_records()?;
        posts
            .into_iter()
            .find(|post| {
                post.slug == slug && post.locale == locale && post.status == PostStatus::Published
            })
            .ok_or_else(|| ApiError::NotFound(format!("blog post {} ({})", slug, locale)))
    }

    // =========================================================================
    // Email Templates & Bulk Send
    // =========================================================================

    pub fn create_email_template(
        &self,
        caller: &Caller,
        template: EmailTemplate,
    ) -> ApiResult<EmailTemplate> {
        self.ensure_staff(caller)?;
        self.create_record(template)
    }

    pub fn update_email_template(
        &self,
        caller: &Caller,
        template_id: &str,
        partial: Value,
    ) -> ApiResult<EmailTemplate> {
        self.ensure_staff(caller)?;
        self.update_record(template_id, partial)
    }

    pub fn delete_email_template(
        &self,
        caller: &Caller,
        template_id: &str,
    ) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<EmailTemplate>(template_id)
    }

    pub fn list_email_templates(&self, caller: &Caller) -> ApiResult<Vec<EmailTemplate>> {
        self.ensure_staff(caller)?;
        self.list_records()
    }

    /// Render a template for the given clients and hand the batch to the
    /// delivery transport (external).
    pub fn build_email_batch(
        &self,
        caller: &Caller,
        template_id: &str,
        client_ids: &[String],
    ) -> ApiResult<EmailBatch> {
        self.ensure_staff(caller)?;
        let store = self.store()?;
        Ok(BulkMailer::new(&store).build_batch(template_id, client_ids)?)
    }

    // =========================================================================
    // SEO Metadata
    // =========================================================================

    pub fn create_seo_metadata(&self, caller: &Caller, seo: SeoMetadata) -> ApiResult<SeoMetadata> {
        self.ensure_staff(caller)?;
        self.create_record(seo)
    }

    pub fn update_seo_metadata(
        &self,
        caller: &Caller,
        seo_id: &str,
        partial: Value,
    ) -> ApiResult<SeoMetadata> {
        self.ensure_staff(caller)?;
        self.update_record(seo_id, partial)
    }

    pub fn delete_seo_metadata(&self, caller: &Caller, seo_id: &str) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<SeoMetadata>(seo_id)
    }

    /// Public lookup used by the page renderer.
    pub fn seo_for_path(&self, path: &str, locale: &str) -> ApiResult<SeoMetadata> {
        let entries: Vec<SeoMetadata> = self.list_records()?;
        entries
            .into_iter()
            .find(|seo| seo.path == path && seo.locale == locale)
            .ok_or_else(|| ApiError::NotFound(format!("seo metadata for {} ({})", path, locale)))
    }

    // =========================================================================
    // Redirects
    // =========================================================================

    pub fn create_redirect(&self, caller: &Caller, redirect: Redirect) -> ApiResult<Redirect> {
        self.ensure_staff(caller)?;
        self.create_record(redirect)
    }

    pub fn delete_redirect(&self, caller: &Caller, redirect_id: &str) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<Redirect>(redirect_id)
    }

    pub fn list_redirects(&self, caller: &Caller) -> ApiResult<Vec<Redirect>> {
        self.ensure_staff(caller)?;
        self.list_records()
    }

    /// Public lookup used by the router.
    pub fn resolve_redirect(&self, from_path: &str) -> ApiResult<Option<Redirect>> {
        let redirects: Vec<Redirect> = self.list_records()?;
        Ok(redirects
            .into_iter()
            .find(|redirect| redirect.from_path == from_path))
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    /// `POST /analytics/view` — public beacon from the site.
    pub fn record_page_view(&self, path: &str) -> ApiResult<u64> {
        let store = self.store()?;
        Ok(PageViews::new(&store).record(path)?)
    }

    /// `GET /analytics?date` — staff report for one day.
    pub fn page_view_report(&self, caller: &Caller, date: &str) -> ApiResult<Vec<PageViewCount>> {
        self.ensure_staff(caller)?;
        let store = self.store()?;
        Ok(PageViews::new(&store).views_for_date(date)?)
    }
}
